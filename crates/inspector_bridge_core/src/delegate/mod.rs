//! Host integration variants.
//!
//! Each variant supplies the host-facing capabilities of an inspector target and the
//! strength with which the page registry's connect callback holds the target handle.
//! [`BridgeDelegate`] captures the target strongly, [`BridgelessHost`] weakly.

use std::sync::Arc;

use crate::engine::{connect_fn, ConnectFn, TargetHandle};
use crate::executor::ExecutorAdapter;
use crate::types::{HostTargetMetadata, OverlaySetPausedInDebuggerMessageRequest, PageReloadRequest};

pub mod bridge;
pub mod bridgeless;

pub use bridge::{BridgeDelegate, HostDelegate};
pub use bridgeless::{BridgelessHost, ReactHost};

pub trait TargetDelegate: Send + Sync + 'static {
    /// Title of the page advertised to debugger frontends.
    const PAGE_TITLE: &'static str;
    const INTEGRATION_NAME: &'static str;

    /// Schedules a reload on the host thread.
    fn on_reload(&self, request: &PageReloadRequest, executor: &ExecutorAdapter);

    /// Schedules an overlay message update on the host thread.
    fn on_set_paused_in_debugger_message(
        &self,
        request: &OverlaySetPausedInDebuggerMessageRequest,
        executor: &ExecutorAdapter,
    );

    /// Reads host metadata on the calling thread. Never fails.
    fn metadata(&self) -> HostTargetMetadata;

    /// Builds the connect callback the page registry stores for this target.
    fn connect_callback(target: &Arc<dyn TargetHandle>) -> ConnectFn;

    /// Drops this delegate's hold on the host. A reference shared in by the host is
    /// left for the host to release.
    fn release(&self);
}

/// Connect callback that keeps the target alive for as long as the registry holds it.
pub(crate) fn strong_connect(target: &Arc<dyn TargetHandle>) -> ConnectFn {
    let target = Arc::clone(target);
    connect_fn(move |remote| target.connect(remote))
}

/// Connect callback that rejects connections once the target has been destroyed.
pub(crate) fn weak_connect(target: &Arc<dyn TargetHandle>) -> ConnectFn {
    let target = Arc::downgrade(target);
    connect_fn(move |remote| match target.upgrade() {
        Some(target) => target.connect(remote),
        None => {
            tracing::warn!("Rejecting debugger connection: inspector target destroyed");
            None
        }
    })
}
