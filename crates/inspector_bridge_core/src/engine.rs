//! The surface this crate needs from the debugging-protocol engine.
//!
//! The engine owns connections, wire encoding and command dispatch. The bridge only
//! creates a target through it, forwards connections to that target and sends it host
//! commands; in return the engine calls back through [`HostTargetCallbacks`].

use std::sync::Arc;

use crate::executor::ExecutorAdapter;
use crate::types::{HostRequest, HostTargetMetadata, OverlaySetPausedInDebuggerMessageRequest, PageReloadRequest};

/// Messages from the engine to the debugger frontend.
pub trait RemoteConnection: Send {
    fn on_message(&mut self, message: String);
    fn on_disconnect(&mut self);
}

/// The engine's end of a debugger session.
pub trait LocalConnection: Send {
    fn send_message(&mut self, message: String);
    fn disconnect(&mut self);
}

/// Commands the host may send to its own target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostCommand {
    DebuggerResume,
    DebuggerStepOver,
}

/// Callbacks the engine invokes, from any thread, on behalf of a connected debugger.
pub trait HostTargetCallbacks: Send + Sync {
    fn on_reload(&self, request: &PageReloadRequest);

    fn on_set_paused_in_debugger_message(&self, request: &OverlaySetPausedInDebuggerMessageRequest);

    fn metadata(&self) -> HostTargetMetadata;

    fn dispatch(&self, request: &HostRequest) {
        match request {
            HostRequest::Reload(request) => self.on_reload(request),
            HostRequest::SetPausedInDebuggerMessage(request) => {
                self.on_set_paused_in_debugger_message(request)
            }
        }
    }
}

/// The engine's representation of this application instance.
pub trait TargetHandle: Send + Sync {
    fn connect(&self, remote: Box<dyn RemoteConnection>) -> Option<Box<dyn LocalConnection>>;

    fn send_command(&self, command: HostCommand);
}

pub trait ProtocolEngine {
    fn create_target(
        &self,
        callbacks: Arc<dyn HostTargetCallbacks>,
        executor: ExecutorAdapter,
    ) -> Arc<dyn TargetHandle>;
}

/// Connect callback stored by the page registry.
pub type ConnectFn =
    Arc<dyn Fn(Box<dyn RemoteConnection>) -> Option<Box<dyn LocalConnection>> + Send + Sync>;

pub fn connect_fn<F>(f: F) -> ConnectFn
where
    F: Fn(Box<dyn RemoteConnection>) -> Option<Box<dyn LocalConnection>> + Send + Sync + 'static,
{
    Arc::new(f)
}
