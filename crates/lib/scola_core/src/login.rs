//! Login flow: credential exchange, role dispatch and session persistence.

use std::sync::Arc;

use async_trait::async_trait;
use time::Duration;
use tracing::{debug, info};

use crate::auth::AuthError;
use crate::auth::claims;
use crate::auth::roles::{Role, RoleRouter};
use crate::config::SessionConfig;
use crate::models::auth::Credentials;
use crate::navigation::Navigator;
use crate::session::SessionStore;

/// Backend that exchanges credentials for a bearer token.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<String, AuthError>;
}

/// Drives a login from submitted credentials to the role home page.
pub struct LoginFlow<B> {
    backend: B,
    store: Arc<dyn SessionStore>,
    router: RoleRouter,
    ttl: Duration,
}

impl<B: AuthBackend> LoginFlow<B> {
    pub fn new(backend: B, store: Arc<dyn SessionStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            backend,
            store,
            router: RoleRouter::new(navigator),
            ttl: SessionConfig::default().ttl,
        }
    }

    pub fn with_config(mut self, config: &SessionConfig) -> Self {
        self.ttl = config.ttl;
        self
    }

    /// Log in and navigate to the role home.
    ///
    /// The role is resolved before anything is persisted, so an unknown role
    /// leaves the store untouched and the user on the login screen.
    pub async fn login(&self, credentials: &Credentials) -> Result<Role, AuthError> {
        let token = self.backend.login(credentials).await?;
        let claims = claims::decode(&token)?;
        let subject = claims.subject.to_lowercase();
        let role = Role::from_subject(&subject)?;

        self.store.save(&token, &subject, self.ttl)?;
        info!(username = %subject, %role, "logged in");

        self.router.dispatch(&subject)
    }

    /// Discard the persisted session.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.store.clear()?;
        debug!("logged out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::navigation::History;
    use crate::session::CookieSessionStore;
    use crate::test_support::mint_token;

    /// Backend that hands out a fixed token, or rejects everyone.
    struct FakeBackend {
        token: Option<String>,
        calls: AtomicU32,
    }

    impl FakeBackend {
        fn issuing(sub: &str) -> Self {
            Self {
                token: Some(mint_token(sub, chrono::Utc::now().timestamp() + 3600)),
                calls: AtomicU32::new(0),
            }
        }

        fn rejecting() -> Self {
            Self {
                token: None,
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl AuthBackend for FakeBackend {
        async fn login(&self, _credentials: &Credentials) -> Result<String, AuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.token
                .clone()
                .ok_or_else(|| AuthError::LoginFailed("401 Unauthorized".into()))
        }
    }

    struct Harness {
        store: Arc<CookieSessionStore>,
        history: Arc<History>,
    }

    fn harness() -> Harness {
        Harness {
            store: Arc::new(CookieSessionStore::in_memory()),
            history: Arc::new(History::starting_at("/login")),
        }
    }

    fn flow(h: &Harness, backend: FakeBackend) -> LoginFlow<FakeBackend> {
        LoginFlow::new(backend, h.store.clone(), h.history.clone())
    }

    fn creds() -> Credentials {
        Credentials::new("bob", "secret")
    }

    #[tokio::test]
    async fn teacher_lands_on_teacher_home_once() {
        let h = harness();
        let flow = flow(&h, FakeBackend::issuing("Bob.Prof"));

        assert_eq!(flow.login(&creds()).await.unwrap(), Role::Teacher);
        assert_eq!(h.history.entries(), vec!["/login", "/teacher"]);

        let session = h.store.read().unwrap();
        assert_eq!(session.username.as_deref(), Some("bob.prof"));
        assert_eq!(claims::decode(&session.token).unwrap().subject, "Bob.Prof");
    }

    #[tokio::test]
    async fn unknown_role_persists_nothing_and_stays_put() {
        let h = harness();
        let flow = flow(&h, FakeBackend::issuing("bob.intern"));

        let err = flow.login(&creds()).await.unwrap_err();
        assert!(matches!(err, AuthError::UnknownRole(_)));
        assert_eq!(err.user_message(), "Authentication error");
        assert!(h.store.read().is_none());
        assert_eq!(h.history.entries(), vec!["/login"]);
    }

    #[tokio::test]
    async fn rejected_credentials_read_as_login_failed() {
        let h = harness();
        let backend = FakeBackend::rejecting();
        let flow = flow(&h, backend);

        let err = flow.login(&creds()).await.unwrap_err();
        assert!(matches!(err, AuthError::LoginFailed(_)));
        assert_eq!(err.user_message(), "Login failed");
        assert_eq!(flow.backend.calls.load(Ordering::SeqCst), 1);
        assert!(h.store.read().is_none());
        assert_eq!(h.history.entries(), vec!["/login"]);
    }

    #[tokio::test]
    async fn junk_token_from_backend_is_an_auth_error() {
        let h = harness();
        let backend = FakeBackend {
            token: Some("not-a-jwt".into()),
            calls: AtomicU32::new(0),
        };
        let flow = flow(&h, backend);

        let err = flow.login(&creds()).await.unwrap_err();
        assert!(matches!(err, AuthError::MalformedToken(_)));
        assert_eq!(err.user_message(), "Authentication error");
        assert!(h.store.read().is_none());
    }

    #[tokio::test]
    async fn logout_clears_and_is_repeatable() {
        let h = harness();
        let flow = flow(&h, FakeBackend::issuing("marie.chef"));

        flow.login(&creds()).await.unwrap();
        assert!(h.store.read().is_some());

        flow.logout().unwrap();
        flow.logout().unwrap();
        assert!(h.store.read().is_none());
    }
}
