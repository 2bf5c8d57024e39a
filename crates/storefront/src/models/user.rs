//! Authenticated user identity.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use qorikusi_core::UserRole;

/// The logged-in user as persisted in the session store.
///
/// The bearer token is kept as a [`SecretString`] so it never shows up in
/// `Debug` output or logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    /// Username or email used to log in.
    pub email: String,
    /// Bearer token issued by the auth service.
    #[serde(serialize_with = "serialize_secret", deserialize_with = "deserialize_secret")]
    pub token: SecretString,
    /// Roles granted by the auth service.
    #[serde(default)]
    pub roles: Vec<UserRole>,
}

impl SessionUser {
    #[must_use]
    pub fn has_role(&self, role: &UserRole) -> bool {
        self.roles.contains(role)
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.has_role(&UserRole::Admin)
    }
}

fn serialize_secret<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

pub(crate) fn deserialize_secret<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SecretString, D::Error> {
    String::deserialize(deserializer).map(SecretString::from)
}
