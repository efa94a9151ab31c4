//! # scola_api_client
//!
//! HTTP client for the Scola backend.
//!
//! Implements the login exchange (`POST /auth/login`) as a
//! [`scola_core::login::AuthBackend`] and sends bearer-authenticated requests
//! to protected endpoints using the token held by a session store.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;
use url::Url;

use scola_core::auth::AuthError;
use scola_core::login::AuthBackend;
use scola_core::models::auth::{Credentials, LoginResponse};
use scola_core::session::SessionStore;

/// Client errors for protected requests.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("No session")]
    NoSession,

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {0}")]
    Status(StatusCode),
}

/// Typed client bound to one backend base URL.
#[derive(Debug, Clone)]
pub struct ScolaClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ScolaClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: Url::parse(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for an API path, keeping any base path prefix.
    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// GET a protected resource with the stored bearer token.
    pub async fn get_protected<T: DeserializeOwned>(
        &self,
        path: &str,
        store: &dyn SessionStore,
    ) -> Result<T, ClientError> {
        let session = store.read().ok_or(ClientError::NoSession)?;
        let url = self.endpoint(path);
        debug!(%url, "GET protected resource");

        let response = self.http.get(&url).bearer_auth(&session.token).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status));
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl AuthBackend for ScolaClient {
    async fn login(&self, credentials: &Credentials) -> Result<String, AuthError> {
        let url = self.endpoint("auth/login");
        debug!(%url, username = %credentials.username, "POST login");

        let response = self
            .http
            .post(&url)
            .json(credentials)
            .send()
            .await
            .map_err(|e| {
                debug!("login transport error: {e}");
                AuthError::LoginFailed(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "login rejected");
            return Err(AuthError::LoginFailed(status.to_string()));
        }

        let body: LoginResponse = response.json().await.map_err(|e| {
            debug!("login response unreadable: {e}");
            AuthError::LoginFailed(e.to_string())
        })?;
        Ok(body.token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_keeps_base_path() {
        let client = ScolaClient::new("http://localhost:8080/api/").unwrap();
        assert_eq!(
            client.endpoint("/auth/login"),
            "http://localhost:8080/api/auth/login"
        );

        let bare = ScolaClient::new("http://localhost:8080").unwrap();
        assert_eq!(bare.endpoint("auth/login"), "http://localhost:8080/auth/login");
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(matches!(
            ScolaClient::new("not a url"),
            Err(ClientError::InvalidUrl(_))
        ));
    }
}
