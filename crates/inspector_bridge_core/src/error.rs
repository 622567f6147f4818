use thiserror::Error;

use crate::registry::PageId;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("{0}")]
    IllegalState(String),

    #[error("Unknown inspector page: {0}")]
    UnknownPage(PageId),

    #[error("Unsupported method: {0}")]
    UnsupportedMethod(String),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    pub fn fusebox_disabled() -> Self {
        Self::IllegalState("Cannot send command while the Fusebox backend is not enabled".to_string())
    }
}
