//! Token decoding, role dispatch and the errors they share.

pub mod claims;
pub mod roles;

use thiserror::Error;

use crate::session::SessionError;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Unknown role for subject '{0}'")]
    UnknownRole(String),

    #[error("Login failed: {0}")]
    LoginFailed(String),

    #[error("Session store error: {0}")]
    Session(#[from] SessionError),
}

impl AuthError {
    /// Inline message shown on the login screen.
    ///
    /// Bad credentials and an unreachable backend read the same.
    pub fn user_message(&self) -> &'static str {
        match self {
            AuthError::LoginFailed(_) => "Login failed",
            _ => "Authentication error",
        }
    }
}
