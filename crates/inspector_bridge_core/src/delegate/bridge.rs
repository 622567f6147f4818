use std::sync::Arc;

use super::{strong_connect, TargetDelegate};
use crate::engine::{ConnectFn, TargetHandle};
use crate::executor::ExecutorAdapter;
use crate::safe_ref::SafeHostRef;
use crate::types::{HostTargetMetadata, OverlaySetPausedInDebuggerMessageRequest, PageReloadRequest, RawMetadata};

/// Host-side delegate object used by the bridge integration.
pub trait HostDelegate: Send + Sync {
    fn on_reload(&self);

    fn on_set_paused_in_debugger_message(&self, request: &OverlaySetPausedInDebuggerMessageRequest);

    fn metadata(&self) -> RawMetadata;
}

/// Bridge integration: forwards to a dedicated [`HostDelegate`].
///
/// In this integration the registry's connect callback is always torn down before the
/// target, so it holds the target strongly.
#[derive(Clone, Debug)]
pub struct BridgeDelegate {
    delegate: SafeHostRef<dyn HostDelegate>,
    owned: bool,
}

impl BridgeDelegate {
    pub fn new(delegate: Arc<dyn HostDelegate>) -> Self {
        Self {
            delegate: SafeHostRef::new(delegate),
            owned: true,
        }
    }

    /// Shares a reference the host releases itself on teardown.
    pub fn from_ref(delegate: SafeHostRef<dyn HostDelegate>) -> Self {
        Self {
            delegate,
            owned: false,
        }
    }
}

impl TargetDelegate for BridgeDelegate {
    const PAGE_TITLE: &'static str = "React Native Bridge (Experimental)";
    const INTEGRATION_NAME: &'static str = "Android Bridge (ReactInstanceManagerInspectorTarget)";

    fn on_reload(&self, _request: &PageReloadRequest, executor: &ExecutorAdapter) {
        let delegate = self.delegate.clone();
        executor.submit(move || match delegate.get() {
            Some(delegate) => delegate.on_reload(),
            None => tracing::debug!("Host delegate released; dropping reload"),
        });
    }

    fn on_set_paused_in_debugger_message(
        &self,
        request: &OverlaySetPausedInDebuggerMessageRequest,
        executor: &ExecutorAdapter,
    ) {
        let delegate = self.delegate.clone();
        let request = request.clone();
        executor.submit(move || match delegate.get() {
            Some(delegate) => delegate.on_set_paused_in_debugger_message(&request),
            None => tracing::debug!("Host delegate released; dropping paused message"),
        });
    }

    fn metadata(&self) -> HostTargetMetadata {
        let raw = self.delegate.get().map(|delegate| delegate.metadata());
        HostTargetMetadata::from_raw(Self::INTEGRATION_NAME, raw.as_ref())
    }

    fn connect_callback(target: &Arc<dyn TargetHandle>) -> ConnectFn {
        strong_connect(target)
    }

    fn release(&self) {
        if self.owned {
            self.delegate.release();
        }
    }
}
