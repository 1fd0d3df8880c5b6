//! Error types for the HTTP clients

use thiserror::Error;

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors produced by the HTTP clients
///
/// Cancellation is deliberately absent: a superseded fetch resolves to
/// `Ok(None)` at its call site instead of surfacing here.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The server answered with a non-success status
    #[error("{message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Normalized server message
        message: String,
    },

    /// Transport level failure
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Input rejected before any network traffic
    #[error(transparent)]
    Invalid(#[from] callscribe_core::Error),
}

impl ClientError {
    /// Create an API error from a status and a normalized message
    #[must_use]
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// HTTP status code when the server produced one
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the failure came from input validation rather than the wire
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Invalid(callscribe_core::Error::Validation { .. })
        )
    }
}
