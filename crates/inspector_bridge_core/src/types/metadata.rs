use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Raw key/value metadata as reported by the host.
pub type RawMetadata = HashMap<String, String>;

pub const APP_IDENTIFIER: &str = "appIdentifier";
pub const DEVICE_NAME: &str = "deviceName";
pub const PLATFORM: &str = "platform";
pub const REACT_NATIVE_VERSION: &str = "reactNativeVersion";

/// Metadata describing the host target, built fresh for every query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostTargetMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_name: Option<String>,
    pub integration_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub react_native_version: Option<String>,
}

impl HostTargetMetadata {
    pub fn new(integration_name: impl Into<String>) -> Self {
        Self {
            integration_name: integration_name.into(),
            ..Default::default()
        }
    }

    /// Projects the recognized keys of `raw`; unknown keys are ignored.
    pub fn from_raw(integration_name: impl Into<String>, raw: Option<&RawMetadata>) -> Self {
        let mut metadata = Self::new(integration_name);
        if let Some(raw) = raw {
            let get = |key: &str| raw.get(key).cloned();
            metadata.app_identifier = get(APP_IDENTIFIER);
            metadata.device_name = get(DEVICE_NAME);
            metadata.platform = get(PLATFORM);
            metadata.react_native_version = get(REACT_NATIVE_VERSION);
        }
        metadata
    }
}
