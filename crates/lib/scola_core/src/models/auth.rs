//! Authentication domain models.

use serde::{Deserialize, Serialize};

/// Claims read from a bearer token. Derived on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedClaims {
    /// Subject, a dotted identifier ending in a role suffix.
    pub subject: String,
    /// Expiry (unix timestamp).
    pub expires_at: i64,
    /// Issued at (unix timestamp), when the backend includes it.
    pub issued_at: Option<i64>,
}

impl DecodedClaims {
    /// Strict comparison: a token expiring in the current second is still valid.
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at < now
    }
}

/// Username/password pair submitted at login.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body returned by `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// What the session store currently holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSession {
    pub token: String,
    pub username: Option<String>,
}
