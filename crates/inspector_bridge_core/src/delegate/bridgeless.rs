use std::sync::Arc;

use super::{weak_connect, TargetDelegate};
use crate::engine::{ConnectFn, TargetHandle};
use crate::executor::ExecutorAdapter;
use crate::safe_ref::SafeHostRef;
use crate::types::{HostTargetMetadata, OverlaySetPausedInDebuggerMessageRequest, PageReloadRequest, RawMetadata};

const RELOAD_REASON: &str = "CDP Page.reload";

/// The host object driven directly by the bridgeless integration.
pub trait ReactHost: Send + Sync {
    fn reload(&self, reason: &str);

    fn set_paused_in_debugger_message(&self, message: Option<&str>);

    fn host_metadata(&self) -> RawMetadata;
}

/// Bridgeless integration: calls the [`ReactHost`] itself.
///
/// The inspector target may be destroyed while the registry still holds its connect
/// callback, so the callback only holds the target weakly.
#[derive(Clone, Debug)]
pub struct BridgelessHost {
    host: SafeHostRef<dyn ReactHost>,
    owned: bool,
}

impl BridgelessHost {
    pub fn new(host: Arc<dyn ReactHost>) -> Self {
        Self {
            host: SafeHostRef::new(host),
            owned: true,
        }
    }

    /// Shares a reference the host releases itself on teardown.
    pub fn from_ref(host: SafeHostRef<dyn ReactHost>) -> Self {
        Self { host, owned: false }
    }
}

impl TargetDelegate for BridgelessHost {
    const PAGE_TITLE: &'static str = "React Native Bridgeless (Experimental)";
    const INTEGRATION_NAME: &'static str = "Android Bridgeless (ReactHostImpl)";

    fn on_reload(&self, _request: &PageReloadRequest, executor: &ExecutorAdapter) {
        let host = self.host.clone();
        executor.submit(move || match host.get() {
            Some(host) => host.reload(RELOAD_REASON),
            None => tracing::debug!("Host released; dropping reload"),
        });
    }

    fn on_set_paused_in_debugger_message(
        &self,
        request: &OverlaySetPausedInDebuggerMessageRequest,
        executor: &ExecutorAdapter,
    ) {
        let host = self.host.clone();
        let message = request.message.clone();
        executor.submit(move || match host.get() {
            Some(host) => host.set_paused_in_debugger_message(message.as_deref()),
            None => tracing::debug!("Host released; dropping paused message"),
        });
    }

    fn metadata(&self) -> HostTargetMetadata {
        let raw = self.host.get().map(|host| host.host_metadata());
        HostTargetMetadata::from_raw(Self::INTEGRATION_NAME, raw.as_ref())
    }

    fn connect_callback(target: &Arc<dyn TargetHandle>) -> ConnectFn {
        weak_connect(target)
    }

    fn release(&self) {
        if self.owned {
            self.host.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{HostCall, QueueExecutor, RecordingHost};

    #[test]
    fn test_reload_uses_fixed_reason() {
        let host = Arc::new(RecordingHost::default());
        let queue = Arc::new(QueueExecutor::default());
        let executor = ExecutorAdapter::new(queue.clone());
        let delegate = BridgelessHost::new(host.clone());

        delegate.on_reload(
            &PageReloadRequest {
                ignore_cache: Some(true),
                script_to_evaluate_on_load: None,
            },
            &executor,
        );
        queue.run_all();

        assert_eq!(host.calls(), vec![HostCall::Reload("CDP Page.reload".into())]);
    }

    #[test]
    fn test_paused_message_forwarded() {
        let host = Arc::new(RecordingHost::default());
        let queue = Arc::new(QueueExecutor::default());
        let executor = ExecutorAdapter::new(queue.clone());
        let delegate = BridgelessHost::new(host.clone());

        delegate.on_set_paused_in_debugger_message(
            &OverlaySetPausedInDebuggerMessageRequest {
                message: Some("Paused".into()),
            },
            &executor,
        );
        queue.run_all();

        assert_eq!(host.calls(), vec![HostCall::PausedMessage(Some("Paused".into()))]);
    }

    #[test]
    fn test_pending_reload_after_host_release_is_noop() {
        let host = Arc::new(RecordingHost::default());
        let queue = Arc::new(QueueExecutor::default());
        let executor = ExecutorAdapter::new(queue.clone());
        let host_ref = SafeHostRef::<dyn ReactHost>::new(host.clone());
        let delegate = BridgelessHost::from_ref(host_ref.clone());

        delegate.on_reload(&PageReloadRequest::default(), &executor);
        delegate.on_set_paused_in_debugger_message(&Default::default(), &executor);
        host_ref.release();

        assert_eq!(queue.run_all(), 2);
        assert!(host.calls().is_empty());
    }

    #[test]
    fn test_metadata_without_host() {
        let host = Arc::new(RecordingHost::default());
        host.set_metadata(&[("deviceName", "Pixel 8")]);
        let delegate = BridgelessHost::new(host);

        assert_eq!(delegate.metadata().device_name.as_deref(), Some("Pixel 8"));

        delegate.release();
        let metadata = delegate.metadata();
        assert_eq!(metadata, HostTargetMetadata::new("Android Bridgeless (ReactHostImpl)"));
    }
}
