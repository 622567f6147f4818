//! The inspector target bridge.
//!
//! An [`InspectorTarget`] is created by the host at startup. When the Fusebox backend is
//! enabled it creates a protocol-engine target for this application and advertises it as
//! a page; on drop it unregisters the page before letting go of the target, so no new
//! debugger connection can reach a target that is being torn down.

use std::fmt;
use std::sync::Arc;

use crate::config::InspectorFlags;
use crate::delegate::{BridgeDelegate, BridgelessHost, TargetDelegate};
use crate::engine::{HostCommand, HostTargetCallbacks, ProtocolEngine, TargetHandle};
use crate::executor::{ExecutorAdapter, HostExecutor};
use crate::registry::{PageCapabilities, PageId, PageRegistry};
use crate::types::{HostTargetMetadata, OverlaySetPausedInDebuggerMessageRequest, PageReloadRequest};
use crate::{BridgeError, Result};

pub type BridgeInspectorTarget = InspectorTarget<BridgeDelegate>;
pub type BridgelessInspectorTarget = InspectorTarget<BridgelessHost>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    /// Fusebox is off: no target and no page.
    Disabled,
    /// A target exists but the registry refused its page.
    Unregistered,
    Registered(PageId),
}

/// The callback surface handed to the protocol engine.
///
/// Holds no reference to the target handle, so the engine's target may own it without
/// forming a cycle.
struct TargetCallbacks<D> {
    delegate: D,
    executor: ExecutorAdapter,
}

impl<D: TargetDelegate> HostTargetCallbacks for TargetCallbacks<D> {
    fn on_reload(&self, request: &PageReloadRequest) {
        tracing::debug!("Forwarding Page.reload to host");
        self.delegate.on_reload(request, &self.executor);
    }

    fn on_set_paused_in_debugger_message(&self, request: &OverlaySetPausedInDebuggerMessageRequest) {
        tracing::debug!("Forwarding Overlay.setPausedInDebuggerMessage to host");
        self.delegate
            .on_set_paused_in_debugger_message(request, &self.executor);
    }

    fn metadata(&self) -> HostTargetMetadata {
        self.delegate.metadata()
    }
}

pub struct InspectorTarget<D: TargetDelegate> {
    callbacks: Arc<TargetCallbacks<D>>,
    target: Option<Arc<dyn TargetHandle>>,
    page_id: Option<PageId>,
    registry: Arc<dyn PageRegistry>,
}

impl<D: TargetDelegate> InspectorTarget<D> {
    pub fn new(
        flags: &InspectorFlags,
        engine: &dyn ProtocolEngine,
        registry: Arc<dyn PageRegistry>,
        executor: Arc<dyn HostExecutor>,
        delegate: D,
    ) -> Self {
        let executor = ExecutorAdapter::new(executor);
        let callbacks = Arc::new(TargetCallbacks {
            delegate,
            executor: executor.clone(),
        });

        if !flags.fusebox_enabled {
            tracing::debug!("Fusebox disabled; {} stays inert", D::PAGE_TITLE);
            return Self {
                callbacks,
                target: None,
                page_id: None,
                registry,
            };
        }

        let engine_callbacks: Arc<dyn HostTargetCallbacks> = callbacks.clone();
        let target = engine.create_target(engine_callbacks, executor);

        let capabilities = PageCapabilities {
            native_page_reloads: true,
            prefers_fusebox_frontend: true,
        };
        let page_id = registry.add_page(
            D::PAGE_TITLE,
            "",
            D::connect_callback(&target),
            capabilities,
        );
        if page_id.is_none() {
            tracing::warn!("Page registry refused {}", D::PAGE_TITLE);
        }

        Self {
            callbacks,
            target: Some(target),
            page_id,
            registry,
        }
    }

    pub fn state(&self) -> TargetState {
        match (&self.target, self.page_id) {
            (None, _) => TargetState::Disabled,
            (Some(_), None) => TargetState::Unregistered,
            (Some(_), Some(id)) => TargetState::Registered(id),
        }
    }

    pub fn page_id(&self) -> Option<PageId> {
        self.page_id
    }

    /// The raw protocol-engine target, for hosts that talk to the engine directly.
    pub fn inspector_target(&self) -> Option<&Arc<dyn TargetHandle>> {
        self.target.as_ref()
    }

    pub fn send_command(&self, command: HostCommand) -> Result<()> {
        let target = self.target.as_ref().ok_or_else(BridgeError::fusebox_disabled)?;
        tracing::debug!("Sending {:?} to inspector target", command);
        target.send_command(command);
        Ok(())
    }

    pub fn send_debugger_resume_command(&self) -> Result<()> {
        self.send_command(HostCommand::DebuggerResume)
    }
}

impl<D: TargetDelegate> HostTargetCallbacks for InspectorTarget<D> {
    fn on_reload(&self, request: &PageReloadRequest) {
        self.callbacks.on_reload(request);
    }

    fn on_set_paused_in_debugger_message(&self, request: &OverlaySetPausedInDebuggerMessageRequest) {
        self.callbacks.on_set_paused_in_debugger_message(request);
    }

    fn metadata(&self) -> HostTargetMetadata {
        self.callbacks.metadata()
    }
}

impl<D: TargetDelegate> fmt::Debug for InspectorTarget<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InspectorTarget")
            .field("integration", &D::INTEGRATION_NAME)
            .field("state", &self.state())
            .finish()
    }
}

impl<D: TargetDelegate> Drop for InspectorTarget<D> {
    fn drop(&mut self) {
        // Unregister first so the registry cannot start a connection mid-teardown.
        if let Some(page_id) = self.page_id.take() {
            self.registry.remove_page(page_id);
        }
        self.target.take();
        self.callbacks.executor.release();
        self.callbacks.delegate.release();
    }
}
