//! REST error types and server error-code messages.

use serde::Deserialize;
use thiserror::Error;

/// Which backend service produced an error.
///
/// A few error codes read differently depending on the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    Products,
    Categories,
    Auth,
}

/// Errors that can occur when talking to the Qorikusi services.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection, TLS, body read).
    #[error("Error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not the JSON we expected.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The service answered with a non-success status.
    #[error("{message}")]
    Server {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Error body returned by the services: `{"code": "...", "message": "..."}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiError {
    /// Build a server error, resolving the user-facing message from `code`.
    #[must_use]
    pub fn server(status: u16, code: Option<String>, service: Option<ServiceKind>) -> Self {
        let message = server_message(service, status, code.as_deref());
        Self::Server {
            status,
            code,
            message,
        }
    }

    /// Build a server error from a raw response body.
    ///
    /// Bodies that are empty or not an [`ErrorBody`] fall back to the status.
    #[must_use]
    pub fn from_response(service: ServiceKind, status: u16, body: &str) -> Self {
        let parsed = serde_json::from_str::<ErrorBody>(body).unwrap_or_default();
        Self::server(status, parsed.code, Some(service))
    }

    /// HTTP status for server errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Server error code, if the service sent one.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Server { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// True for authentication failures that should end the session.
    #[must_use]
    pub fn is_token_error(&self) -> bool {
        self.code().is_some_and(is_token_code)
    }
}

fn is_token_code(code: &str) -> bool {
    matches!(
        code,
        "INVALID_TOKEN" | "INVALID_TOKEN_SIGNATURE" | "TOKEN_EXPIRED"
    )
}

fn server_message(service: Option<ServiceKind>, status: u16, code: Option<&str>) -> String {
    let Some(code) = code.filter(|c| !c.is_empty()) else {
        return format!("Server error ({status})");
    };

    let message = match code {
        "PRODUCT_NOT_FOUND" => "Product not found",
        "CATEGORY_NOT_FOUND" if service == Some(ServiceKind::Categories) => "No categories found",
        "CATEGORY_NOT_FOUND" => "Category not found",
        c if is_token_code(c) && service == Some(ServiceKind::Auth) => {
            "The token is invalid or has expired"
        }
        c if is_token_code(c) => "Session expired. Please log in again",
        "INTERNAL_ERROR" => "Internal server error. Please try again later",
        "USER_ALREADY_EXISTS" => "User already exists",
        "EMAIL_ALREADY_EXISTS" => "Email is already registered",
        "CLIENT_NOT_FOUND" => "Client not found",
        "INVALID_CREDENTIALS" => "Incorrect username or password",
        "CREDENTIALS_DISABLED" => "Your account has been disabled",
        other => return format!("Error: {other}"),
    };
    message.to_string()
}
