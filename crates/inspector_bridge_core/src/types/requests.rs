use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{BridgeError, Result};

const PAGE_RELOAD: &str = "Page.reload";
const OVERLAY_SET_PAUSED_IN_DEBUGGER_MESSAGE: &str = "Overlay.setPausedInDebuggerMessage";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageReloadRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_cache: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_to_evaluate_on_load: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlaySetPausedInDebuggerMessageRequest {
    /// Message to show in the overlay; `None` hides it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Debugger requests the engine hands to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostRequest {
    Reload(PageReloadRequest),
    SetPausedInDebuggerMessage(OverlaySetPausedInDebuggerMessageRequest),
}

#[derive(Deserialize)]
struct Envelope {
    method: String,
    #[serde(default)]
    params: Option<Value>,
}

impl HostRequest {
    pub fn method(&self) -> &'static str {
        match self {
            Self::Reload(_) => PAGE_RELOAD,
            Self::SetPausedInDebuggerMessage(_) => OVERLAY_SET_PAUSED_IN_DEBUGGER_MESSAGE,
        }
    }

    /// Decodes a CDP-style `{"method": ..., "params": ...}` message.
    pub fn from_json(message: &str) -> Result<Self> {
        let envelope: Envelope = serde_json::from_str(message)?;
        let params = envelope
            .params
            .unwrap_or_else(|| Value::Object(Default::default()));

        match envelope.method.as_str() {
            PAGE_RELOAD => Ok(Self::Reload(serde_json::from_value(params)?)),
            OVERLAY_SET_PAUSED_IN_DEBUGGER_MESSAGE => {
                Ok(Self::SetPausedInDebuggerMessage(serde_json::from_value(params)?))
            }
            _ => Err(BridgeError::UnsupportedMethod(envelope.method)),
        }
    }
}
