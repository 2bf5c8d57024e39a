//! CLI subcommands.

pub mod admin;
pub mod catalog;
pub mod totals;

use thiserror::Error;

use qorikusi_storefront::api::ApiError;
use qorikusi_storefront::config::ConfigError;
use qorikusi_storefront::error::AppError;
use qorikusi_storefront::services::auth::AuthError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    App(#[from] AppError),

    /// A `totals` line item did not look like `<PRICE>x<QTY>`.
    #[error("Invalid line item '{0}': expected <PRICE>x<QTY>, e.g. 180x2")]
    InvalidLineItem(String),

    /// Admin command run with a non-admin account.
    #[error("Account {0} is not an administrator")]
    NotAdmin(String),
}

impl CliError {
    /// Forward server failures to Sentry.
    pub fn report(&self) {
        match self {
            Self::App(err) => err.report(),
            other => tracing::debug!(error = %other, "Usage error"),
        }
    }

    /// The message printed when the command fails.
    pub fn user_message(&self) -> String {
        match self {
            Self::App(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::App(err.into())
    }
}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        Self::App(err.into())
    }
}

impl From<AuthError> for CliError {
    fn from(err: AuthError) -> Self {
        Self::App(err.into())
    }
}
