//! Authentication error types.

use thiserror::Error;

use crate::api::ApiError;
use crate::validation::FormErrors;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The form failed local validation; nothing was sent.
    #[error("validation failed: {0}")]
    Validation(#[from] FormErrors),

    /// The auth service rejected the request or could not be reached.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// The session user could not be persisted.
    #[error("session storage error: {0}")]
    Session(#[from] serde_json::Error),
}

impl AuthError {
    /// True if the service said the username or password is wrong.
    #[must_use]
    pub fn is_invalid_credentials(&self) -> bool {
        matches!(self, Self::Api(e) if e.code() == Some("INVALID_CREDENTIALS"))
    }
}
