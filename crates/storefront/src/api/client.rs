//! Shared HTTP plumbing for the Qorikusi REST services.

use std::sync::Arc;

use reqwest::Method;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::{ApiError, ServiceKind};
use crate::services::session::SessionStore;

/// Paths that never carry the bearer token.
const PUBLIC_AUTH_PATHS: &[&str] = &[
    "/auth/login",
    "/auth/register",
    "/auth/forgot-password",
    "/auth/reset-password",
];

/// Whether a request needs the session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Attach the bearer token when one is stored.
    Authenticated,
    /// Never attach the token.
    Public,
}

/// A JSON client bound to one service base URL.
///
/// Cheap to clone; clones share the connection pool and session.
#[derive(Clone)]
pub struct RestClient {
    inner: Arc<RestClientInner>,
}

struct RestClientInner {
    client: reqwest::Client,
    base_url: Url,
    service: ServiceKind,
    session: SessionStore,
}

impl RestClient {
    /// Create a client for `service` rooted at `base_url`.
    #[must_use]
    pub fn new(base_url: Url, service: ServiceKind, session: SessionStore) -> Self {
        Self::with_http_client(reqwest::Client::new(), base_url, service, session)
    }

    /// Create a client that reuses an existing connection pool.
    #[must_use]
    pub fn with_http_client(
        client: reqwest::Client,
        base_url: Url,
        service: ServiceKind,
        session: SessionStore,
    ) -> Self {
        Self {
            inner: Arc::new(RestClientInner {
                client,
                base_url,
                service,
                session,
            }),
        }
    }

    /// Same connection pool and session, different service.
    #[must_use]
    pub fn for_service(&self, base_url: Url, service: ServiceKind) -> Self {
        Self::with_http_client(
            self.inner.client.clone(),
            base_url,
            service,
            self.inner.session.clone(),
        )
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    #[must_use]
    pub fn service(&self) -> ServiceKind {
        self.inner.service
    }

    /// Resolve `path` against the base URL, keeping any base path prefix.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Url` if the result is not a valid URL.
    pub fn url(&self, path: &str) -> Result<Url, ApiError> {
        let joined = format!(
            "{}/{}",
            self.inner.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Ok(Url::parse(&joined)?)
    }

    /// `GET` and decode a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the service answers with a
    /// non-success status, or the body does not decode.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let body = self
            .execute::<()>(Method::GET, path, query, None, Access::Authenticated)
            .await?;
        self.decode(&body)
    }

    /// `POST` a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Same as [`RestClient::get`].
    pub async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        access: Access,
    ) -> Result<T, ApiError> {
        let text = self
            .execute(Method::POST, path, &[], Some(body), access)
            .await?;
        self.decode(&text)
    }

    /// `POST` a JSON body and ignore the response body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not a success.
    pub async fn post_unit<B: Serialize + Sync>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &B,
        access: Access,
    ) -> Result<(), ApiError> {
        self.execute(Method::POST, path, query, Some(body), access)
            .await
            .map(|_| ())
    }

    /// `PUT` a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Same as [`RestClient::get`].
    pub async fn put<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let text = self
            .execute(Method::PUT, path, &[], Some(body), Access::Authenticated)
            .await?;
        self.decode(&text)
    }

    async fn execute<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
        access: Access,
    ) -> Result<String, ApiError> {
        let url = self.url(path)?;
        let attach_token = access == Access::Authenticated && !is_public_path(url.path());

        let mut request = self.inner.client.request(method, url.clone());
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        if attach_token && let Some(token) = self.inner.session.token() {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            let err =
                ApiError::from_response(self.inner.service, status.as_u16(), &response_text);
            tracing::error!(
                status = %status,
                url = %url,
                code = err.code().unwrap_or_default(),
                body = %response_text.chars().take(500).collect::<String>(),
                "Service returned non-success status"
            );
            return Err(err);
        }

        Ok(response_text)
    }

    fn decode<T: DeserializeOwned>(&self, body: &str) -> Result<T, ApiError> {
        serde_json::from_str(body).map_err(|e| {
            tracing::error!(
                error = %e,
                service = ?self.inner.service,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse service response"
            );
            ApiError::Parse(e)
        })
    }
}

/// True if `path` is one of the public authentication endpoints.
///
/// Matches whole path segments, so `/api/auth/register/client` is public but
/// `/admin/auth/register-audit` is not.
#[must_use]
pub fn is_public_path(path: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    PUBLIC_AUTH_PATHS.iter().any(|public| {
        let wanted: Vec<&str> = public.split('/').filter(|s| !s.is_empty()).collect();
        segments.windows(wanted.len()).any(|window| window == wanted.as_slice())
    })
}
