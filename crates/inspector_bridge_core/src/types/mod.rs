pub mod metadata;
pub mod requests;

pub use metadata::{HostTargetMetadata, RawMetadata};
pub use requests::{HostRequest, OverlaySetPausedInDebuggerMessageRequest, PageReloadRequest};
