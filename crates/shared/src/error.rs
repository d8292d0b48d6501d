//! Errors crossing the JSON bridge

use thiserror::Error;
use xonline_domain::DomainError;

#[derive(Debug, Error)]
pub enum BridgeError {
    /// Document has the wrong shape (e.g. an object where a list is expected)
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// This object kind cannot be decoded from a backend document
    #[error("Decoding {0} is not supported")]
    Unsupported(&'static str),

    /// Encoding failed
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Decoded values violate a record invariant
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl BridgeError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedInput(msg.into())
    }

    /// Whether the caller should treat the response as "no data"
    pub fn is_malformed(&self) -> bool {
        matches!(self, BridgeError::MalformedInput(_))
    }
}
