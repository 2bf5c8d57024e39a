//! Authentication service.
//!
//! Logs users in against the auth service, keeps the session user and bearer
//! token in the [`SessionStore`], and publishes the current user to
//! subscribers.

mod error;

pub use error::AuthError;

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::sync::watch;
use tracing::{info, instrument};

use qorikusi_core::UserRole;

use crate::api::{ApiError, LoginResponse};
use crate::models::SessionUser;
use crate::services::session::SessionStore;
use crate::validation::{FormErrors, TouchedFields, Validator};

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Field names used in [`FormErrors`] by the auth forms.
pub mod auth_fields {
    pub const USERNAME: &str = "username";
    pub const EMAIL: &str = "email";
    pub const PASSWORD: &str = "password";
    pub const ACCEPT_TERMS: &str = "accept_terms";
    pub const TOKEN: &str = "token";
}

/// The auth service endpoints.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, username_or_email: &str, password: &str) -> Result<LoginResponse, ApiError>;

    async fn register_client(&self, email: &str, password: &str) -> Result<(), ApiError>;

    async fn forgot_password(&self, email: &str) -> Result<(), ApiError>;

    async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), ApiError>;
}

/// Client self-registration form.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub email: String,
    pub password: String,
    pub accept_terms: bool,
    pub touched: TouchedFields,
}

impl RegistrationForm {
    /// # Errors
    ///
    /// Returns the per-field errors if any rule fails.
    pub fn validate(&self) -> Result<(), FormErrors> {
        use auth_fields::{ACCEPT_TERMS, EMAIL, PASSWORD};

        let mut v = Validator::new();
        v.required(EMAIL, &self.email)
            .email(EMAIL, self.email.trim())
            .required(PASSWORD, &self.password)
            .min_length(PASSWORD, &self.password, MIN_PASSWORD_LENGTH)
            .accepted(ACCEPT_TERMS, self.accept_terms);
        v.finish()
    }
}

/// Authentication service.
///
/// Cheap to clone; clones share the current-user channel.
#[derive(Clone)]
pub struct AuthService {
    backend: Arc<dyn AuthBackend>,
    session: SessionStore,
    current: Arc<watch::Sender<Option<SessionUser>>>,
}

impl AuthService {
    /// Create the service, restoring any user already in the session.
    #[must_use]
    pub fn new(backend: Arc<dyn AuthBackend>, session: SessionStore) -> Self {
        let (current, _rx) = watch::channel(session.load_user());
        Self {
            backend,
            session,
            current: Arc::new(current),
        }
    }

    // =========================================================================
    // Service calls
    // =========================================================================

    /// Log in with a username or email.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if either field is blank, or
    /// `AuthError::Api` with the service's message if login is rejected.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        username_or_email: &str,
        password: &str,
    ) -> Result<SessionUser, AuthError> {
        let mut v = Validator::new();
        v.required(auth_fields::USERNAME, username_or_email)
            .required(auth_fields::PASSWORD, password);
        v.finish()?;

        let username_or_email = username_or_email.trim();
        let response = self.backend.login(username_or_email, password).await?;
        let user = SessionUser {
            email: username_or_email.to_string(),
            token: response.access_token,
            roles: response.roles,
        };

        self.session.save(&user)?;
        self.current.send_replace(Some(user.clone()));
        crate::error::set_sentry_user(&user.email);
        info!(admin = user.is_admin(), "User logged in");
        Ok(user)
    }

    /// Register a new client account.
    ///
    /// On validation failure every field is marked touched.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` or the service's rejection.
    #[instrument(skip(self, form), fields(email = %form.email))]
    pub async fn register_client(&self, form: &mut RegistrationForm) -> Result<(), AuthError> {
        if let Err(errors) = form.validate() {
            form.touched.touch_all(&[
                auth_fields::EMAIL,
                auth_fields::PASSWORD,
                auth_fields::ACCEPT_TERMS,
            ]);
            return Err(errors.into());
        }

        self.backend
            .register_client(form.email.trim(), &form.password)
            .await?;
        info!("Client registered");
        Ok(())
    }

    /// Ask the service to email a password reset link.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` for a blank or malformed email.
    #[instrument(skip(self))]
    pub async fn forgot_password(&self, email: &str) -> Result<(), AuthError> {
        let mut v = Validator::new();
        v.required(auth_fields::EMAIL, email)
            .email(auth_fields::EMAIL, email.trim());
        v.finish()?;

        self.backend.forgot_password(email.trim()).await?;
        Ok(())
    }

    /// Set a new password using the token from the reset link.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` for a missing token or short password.
    #[instrument(skip_all)]
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AuthError> {
        let mut v = Validator::new();
        v.required(auth_fields::TOKEN, token)
            .required(auth_fields::PASSWORD, new_password)
            .min_length(auth_fields::PASSWORD, new_password, MIN_PASSWORD_LENGTH);
        v.finish()?;

        self.backend.reset_password(token.trim(), new_password).await?;
        Ok(())
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Forget the user and token.
    pub fn logout(&self) {
        self.session.clear();
        self.current.send_replace(None);
        crate::error::clear_sentry_user();
        info!("User logged out");
    }

    /// True while a bearer token is stored.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.token().is_some()
    }

    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.session.token()
    }

    #[must_use]
    pub fn has_role(&self, role: &UserRole) -> bool {
        self.current
            .borrow()
            .as_ref()
            .is_some_and(|user| user.has_role(role))
    }

    #[must_use]
    pub fn current_user(&self) -> Option<SessionUser> {
        self.current.borrow().clone()
    }

    /// Receive the current user on every login and logout.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<SessionUser>> {
        self.current.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use secrecy::ExposeSecret;

    use super::*;
    use crate::services::session::{KeyValueStore, MemoryStore, USER_KEY};
    use crate::validation::FieldError;

    #[derive(Default)]
    struct FakeBackend {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl AuthBackend for FakeBackend {
        async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
            self.calls.lock().unwrap().push(format!("login:{username}"));
            if password == "correcta" {
                Ok(LoginResponse {
                    access_token: SecretString::from("jwt-token"),
                    roles: vec![UserRole::Admin],
                })
            } else {
                Err(ApiError::server(
                    401,
                    Some("INVALID_CREDENTIALS".to_string()),
                    Some(crate::api::ServiceKind::Auth),
                ))
            }
        }

        async fn register_client(&self, email: &str, _password: &str) -> Result<(), ApiError> {
            self.calls.lock().unwrap().push(format!("register:{email}"));
            Ok(())
        }

        async fn forgot_password(&self, email: &str) -> Result<(), ApiError> {
            self.calls.lock().unwrap().push(format!("forgot:{email}"));
            Ok(())
        }

        async fn reset_password(&self, token: &str, _new: &str) -> Result<(), ApiError> {
            self.calls.lock().unwrap().push(format!("reset:{token}"));
            Ok(())
        }
    }

    fn service() -> (AuthService, Arc<FakeBackend>) {
        let backend = Arc::new(FakeBackend::default());
        (
            AuthService::new(backend.clone(), SessionStore::in_memory()),
            backend,
        )
    }

    #[tokio::test]
    async fn test_login_stores_session_and_publishes() {
        let (auth, _) = service();
        let mut rx = auth.subscribe();

        let user = auth.login(" admin@qorikusi.pe ", "correcta").await.unwrap();

        assert_eq!(user.email, "admin@qorikusi.pe");
        assert!(auth.is_authenticated());
        assert_eq!(auth.token().unwrap().expose_secret(), "jwt-token");
        assert!(auth.has_role(&UserRole::Admin));
        assert!(!auth.has_role(&UserRole::Client));
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_some());
    }

    #[tokio::test]
    async fn test_login_rejected_keeps_logged_out() {
        let (auth, _) = service();
        let err = auth.login("ana", "mala").await.unwrap_err();

        assert!(err.is_invalid_credentials());
        assert_eq!(err.to_string(), "Incorrect username or password");
        assert!(!auth.is_authenticated());
        assert!(auth.current_user().is_none());
    }

    #[tokio::test]
    async fn test_blank_login_never_calls_backend() {
        let (auth, backend) = service();
        let err = auth.login("  ", "").await.unwrap_err();

        assert!(matches!(err, AuthError::Validation(_)));
        assert!(backend.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let (auth, _) = service();
        auth.login("admin", "correcta").await.unwrap();
        auth.logout();

        assert!(!auth.is_authenticated());
        assert!(auth.current_user().is_none());
        assert!(!auth.has_role(&UserRole::Admin));
    }

    #[tokio::test]
    async fn test_register_validation() {
        let (auth, backend) = service();
        let mut form = RegistrationForm {
            email: "no-es-correo".to_string(),
            password: "123".to_string(),
            accept_terms: false,
            touched: TouchedFields::default(),
        };

        let Err(AuthError::Validation(errors)) = auth.register_client(&mut form).await else {
            panic!("expected validation error");
        };
        assert_eq!(errors.get(auth_fields::EMAIL), Some(&FieldError::InvalidEmail));
        assert_eq!(
            errors.get(auth_fields::PASSWORD),
            Some(&FieldError::MinLength { required: 6 })
        );
        assert_eq!(errors.get(auth_fields::ACCEPT_TERMS), Some(&FieldError::MustAccept));
        assert!(form.touched.is_touched(auth_fields::EMAIL));
        assert!(backend.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_register_sends_trimmed_email() {
        let (auth, backend) = service();
        let mut form = RegistrationForm {
            email: " ana@qorikusi.pe ".to_string(),
            password: "secreto".to_string(),
            accept_terms: true,
            touched: TouchedFields::default(),
        };

        auth.register_client(&mut form).await.unwrap();
        assert_eq!(
            backend.calls.lock().unwrap().as_slice(),
            ["register:ana@qorikusi.pe"]
        );
    }

    #[tokio::test]
    async fn test_password_recovery() {
        let (auth, backend) = service();
        assert!(auth.forgot_password("mal").await.is_err());
        auth.forgot_password("ana@qorikusi.pe").await.unwrap();
        assert!(auth.reset_password("tok", "12345").await.is_err());
        auth.reset_password("tok", "123456").await.unwrap();

        assert_eq!(
            backend.calls.lock().unwrap().as_slice(),
            ["forgot:ana@qorikusi.pe", "reset:tok"]
        );
    }

    #[test]
    fn test_restores_stored_user() {
        let store = Arc::new(MemoryStore::default());
        store.set(
            USER_KEY,
            r#"{"email":"ana@qorikusi.pe","token":"t","roles":["CLIENTE"]}"#.to_string(),
        );
        let auth = AuthService::new(
            Arc::new(FakeBackend::default()),
            SessionStore::new(store),
        );
        assert_eq!(auth.current_user().unwrap().email, "ana@qorikusi.pe");
        assert!(auth.has_role(&UserRole::Client));
    }

    #[test]
    fn test_corrupt_stored_user_is_absent() {
        let store = Arc::new(MemoryStore::default());
        store.set(USER_KEY, "not json".to_string());
        let auth = AuthService::new(
            Arc::new(FakeBackend::default()),
            SessionStore::new(store),
        );
        assert!(auth.current_user().is_none());
    }
}
