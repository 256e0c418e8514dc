//! Error taxonomy for auth session requests.
//!
//! ERROR HANDLING
//! ==============
//! Request helpers return `Result<_, AuthError>`; the session controller logs
//! these and degrades state instead of propagating them to the UI.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use thiserror::Error;

/// Failure of a single auth endpoint call.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The request could not be sent or no response arrived.
    #[error("transport error: {0}")]
    Transport(String),
    /// The server answered with a non-2xx status.
    #[error("request failed with status {0}")]
    Status(u16),
    /// A required response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
    /// HTTP is not available in this build (server-side rendering).
    #[error("not available on server")]
    Unavailable,
    /// The request was abandoned before it completed.
    #[error("request cancelled")]
    Cancelled,
}

impl AuthError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status(status) => *status >= 500 || *status == 429,
            Self::Decode(_) | Self::Unavailable | Self::Cancelled => false,
        }
    }
}
