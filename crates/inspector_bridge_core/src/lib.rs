//! Inspector Bridge Core
//!
//! Lifecycle and command bridge between a host application and a debugging-protocol
//! engine. Registers the running application as an inspectable page, accepts debugger
//! connections, and marshals inbound debugger commands onto the host's own thread.

pub mod config;
pub mod delegate;
pub mod engine;
pub mod error;
pub mod executor;
pub mod host_thread;
pub mod registry;
pub mod safe_ref;
pub mod target;
pub mod types;

#[cfg(test)]
mod fakes;

// Re-export commonly used types
pub use config::InspectorFlags;
pub use delegate::{BridgeDelegate, BridgelessHost, HostDelegate, ReactHost, TargetDelegate};
pub use engine::{HostCommand, HostTargetCallbacks, ProtocolEngine, TargetHandle};
pub use error::BridgeError;
pub use executor::{ExecutorAdapter, HostExecutor};
pub use host_thread::HostThread;
pub use registry::{InspectorRegistry, PageCapabilities, PageId, PageRegistry};
pub use safe_ref::SafeHostRef;
pub use target::{BridgeInspectorTarget, BridgelessInspectorTarget, InspectorTarget, TargetState};

/// Result type alias using BridgeError
pub type Result<T> = std::result::Result<T, BridgeError>;
