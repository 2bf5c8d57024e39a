//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type for front ends built on this crate.
//! Call [`AppError::report`] before showing an error so server-side failures
//! reach Sentry.

use thiserror::Error;

use crate::api::ApiError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::services::auth::AuthError;
use crate::validation::FormErrors;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// A backend service call failed.
    #[error("Service error: {0}")]
    Api(#[from] ApiError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// A checkout transition was rejected.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// A form failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] FormErrors),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad input from the user.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether the failure is ours (or a backend's) rather than the user's.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        match self {
            Self::Config(_)
            | Self::Internal(_)
            | Self::Auth(AuthError::Session(_))
            | Self::Checkout(CheckoutError::Processing(_)) => true,
            Self::Api(err) | Self::Auth(AuthError::Api(err)) => is_server_api_error(err),
            _ => false,
        }
    }

    /// The message to show a shopper. Internal details are hidden.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(_) | Self::Internal(_) => "Internal error".to_string(),
            Self::Api(err) | Self::Auth(AuthError::Api(err)) => match err {
                ApiError::Http(_) | ApiError::Parse(_) | ApiError::Url(_) => {
                    "External service error".to_string()
                }
                other => other.to_string(),
            },
            Self::Auth(AuthError::Validation(errors)) | Self::Validation(errors) => {
                errors.to_string()
            }
            Self::Auth(AuthError::Session(_)) => "Could not save your session".to_string(),
            Self::Checkout(err) => err.to_string(),
            Self::NotFound(_) | Self::BadRequest(_) => self.to_string(),
        }
    }

    /// Capture server errors to Sentry and log them.
    pub fn report(&self) {
        if self.is_server_error() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        } else {
            tracing::debug!(error = %self, "User-facing error");
        }
    }
}

fn is_server_api_error(err: &ApiError) -> bool {
    match err {
        ApiError::Http(_) | ApiError::Parse(_) | ApiError::Url(_) => true,
        ApiError::Server { status, .. } => *status >= 500,
        ApiError::NotFound(_) => false,
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context.
///
/// Call this after a successful login to associate errors with the user.
pub fn set_sentry_user(email: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            email: Some(email.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("checkout", "Advanced to payment", Some(&[("order", "482913")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
