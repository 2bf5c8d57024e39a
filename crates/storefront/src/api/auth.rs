//! Auth service client.

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use qorikusi_core::UserRole;

use super::{Access, ApiError, RestClient};
use crate::models::user::deserialize_secret;
use crate::services::auth::AuthBackend;

/// Successful login: the bearer token plus the roles it grants.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(deserialize_with = "deserialize_secret")]
    pub access_token: SecretString,
    #[serde(default)]
    pub roles: Vec<UserRole>,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    #[serde(rename = "usuarioOCorreo")]
    username_or_email: &'a str,
    #[serde(rename = "contrasenia")]
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterClientRequest<'a> {
    #[serde(rename = "correo")]
    email: &'a str,
    #[serde(rename = "contrasenia")]
    password: &'a str,
}

#[derive(Serialize)]
struct ForgotPasswordRequest<'a> {
    #[serde(rename = "correo")]
    email: &'a str,
}

#[derive(Serialize)]
struct ResetPasswordRequest<'a> {
    #[serde(rename = "nuevaContrasenia")]
    new_password: &'a str,
}

/// HTTP implementation of [`AuthBackend`].
///
/// Every endpoint here is public: no bearer token is ever sent.
#[derive(Clone)]
pub struct AuthClient {
    rest: RestClient,
}

impl AuthClient {
    #[must_use]
    pub const fn new(rest: RestClient) -> Self {
        Self { rest }
    }
}

#[async_trait]
impl AuthBackend for AuthClient {
    #[instrument(skip(self, password))]
    async fn login(&self, username_or_email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest {
            username_or_email,
            password,
        };
        let response: LoginResponse = self.rest.post("login", &body, Access::Public).await?;
        debug!(roles = ?response.roles, "Login accepted");
        Ok(response)
    }

    #[instrument(skip(self, password))]
    async fn register_client(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let body = RegisterClientRequest { email, password };
        self.rest
            .post_unit("register/client", &[], &body, Access::Public)
            .await
    }

    #[instrument(skip(self))]
    async fn forgot_password(&self, email: &str) -> Result<(), ApiError> {
        let body = ForgotPasswordRequest { email };
        self.rest
            .post_unit("forgot-password", &[], &body, Access::Public)
            .await
    }

    #[instrument(skip(self, token, new_password))]
    async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), ApiError> {
        let body = ResetPasswordRequest { new_password };
        self.rest
            .post_unit(
                "reset-password",
                &[("token", token.to_string())],
                &body,
                Access::Public,
            )
            .await
    }
}
