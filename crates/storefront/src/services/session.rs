//! Persisted session state.
//!
//! The logged-in user is stored as JSON under `usuario` and the bearer token
//! on its own under `token`, in whatever [`KeyValueStore`] the host provides.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use secrecy::SecretString;
use tracing::warn;

use crate::models::SessionUser;

/// Key holding the serialized [`SessionUser`].
pub const USER_KEY: &str = "usuario";
/// Key holding the raw bearer token.
pub const TOKEN_KEY: &str = "token";

/// String key-value persistence (browser local storage, a file, memory).
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
    fn remove(&self, key: &str);
}

/// In-process [`KeyValueStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: String) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

/// Typed access to the session keys. Cheap to clone.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// A session backed by a fresh [`MemoryStore`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::default()))
    }

    /// The stored user. Corrupt JSON is treated as no user.
    #[must_use]
    pub fn load_user(&self) -> Option<SessionUser> {
        let json = self.store.get(USER_KEY)?;
        match serde_json::from_str(&json) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "Ignoring corrupt stored session user");
                None
            }
        }
    }

    /// Persist `user` and its token.
    ///
    /// # Errors
    ///
    /// Returns an error if the user cannot be serialized.
    pub fn save(&self, user: &SessionUser) -> Result<(), serde_json::Error> {
        use secrecy::ExposeSecret;

        let json = serde_json::to_string(user)?;
        self.store.set(USER_KEY, json);
        self.store
            .set(TOKEN_KEY, user.token.expose_secret().to_string());
        Ok(())
    }

    /// The stored bearer token, if any.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.store
            .get(TOKEN_KEY)
            .filter(|t| !t.is_empty())
            .map(SecretString::from)
    }

    /// Remove both session keys.
    pub fn clear(&self) {
        self.store.remove(USER_KEY);
        self.store.remove(TOKEN_KEY);
    }
}
