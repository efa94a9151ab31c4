//! Session token store.
//!
//! The store is the only writer of the bearer token. Everything else reads it
//! through [`SessionStore::read`], which performs no validation.

pub mod cookies;

use thiserror::Error;
use time::Duration;

pub use self::cookies::CookieSessionStore;
pub use crate::models::auth::StoredSession;

/// Session store errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cookie error: {0}")]
    Cookie(String),
}

/// Persisted holder of the bearer token and the derived username.
pub trait SessionStore: Send + Sync {
    /// Whatever is currently persisted. May be stale.
    fn read(&self) -> Option<StoredSession>;

    /// Persist both fields with a shared expiration `ttl` from now.
    fn save(&self, token: &str, username: &str, ttl: Duration) -> Result<(), SessionError>;

    /// Remove both fields. Clearing an empty store succeeds.
    fn clear(&self) -> Result<(), SessionError>;
}
