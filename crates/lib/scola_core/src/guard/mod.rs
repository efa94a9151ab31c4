//! Session guard for protected routes.
//!
//! Each route activation starts `Pending`, decodes the stored token once, and
//! settles on `Valid` or `Invalid`. Absent, malformed and expired sessions all
//! end the same way: the store is cleared (when it held something) and the
//! user is sent to the login page with a history replace.


use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::auth::claims;
use crate::clock::{Clock, SystemClock};
use crate::config::SessionConfig;
use crate::navigation::{NavigationMode, Navigator};
use crate::session::SessionStore;

/// Where one route activation stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Pending,
    Valid,
    Invalid,
}

/// Why a session was rejected. Logged, never returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    Absent,
    Malformed,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Valid,
    Invalid(Rejection),
}

/// Gate in front of protected content.
#[derive(Clone)]
pub struct SessionGuard {
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    clock: Arc<dyn Clock>,
    login_path: String,
}

impl SessionGuard {
    pub fn new(store: Arc<dyn SessionStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            store,
            navigator,
            clock: Arc::new(SystemClock),
            login_path: SessionConfig::default().login_path,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_config(mut self, config: &SessionConfig) -> Self {
        self.login_path = config.login_path.clone();
        self
    }

    /// Decide and commit synchronously: clears a bad session and returns the
    /// final state. Does not navigate.
    pub fn check(&self) -> SessionState {
        let verdict = self.evaluate();
        self.invalidate_if_needed(verdict);
        verdict.into()
    }

    /// Start a route activation in `Pending`.
    pub fn mount(&self) -> GuardedRoute {
        let (state, _) = watch::channel(SessionState::Pending);
        GuardedRoute {
            guard: self.clone(),
            state,
            claimed: AtomicBool::new(false),
            unmounted: CancellationToken::new(),
        }
    }

    /// Mount, resolve, and hand back `content` only for a valid session.
    pub async fn protect<T>(&self, content: impl FnOnce() -> T) -> Option<T> {
        let route = self.mount();
        route.resolve().await;
        route.render(content)
    }

    fn evaluate(&self) -> Verdict {
        let Some(session) = self.store.read() else {
            return Verdict::Invalid(Rejection::Absent);
        };
        match claims::decode(&session.token) {
            Err(e) => {
                debug!("stored token rejected: {e}");
                Verdict::Invalid(Rejection::Malformed)
            }
            Ok(claims) if claims.is_expired_at(self.clock.now()) => {
                debug!(exp = claims.expires_at, "stored token expired");
                Verdict::Invalid(Rejection::Expired)
            }
            Ok(_) => Verdict::Valid,
        }
    }

    fn invalidate_if_needed(&self, verdict: Verdict) {
        if let Verdict::Invalid(Rejection::Malformed | Rejection::Expired) = verdict
            && let Err(e) = self.store.clear()
        {
            warn!("failed to clear rejected session: {e}");
        }
    }
}

impl From<Verdict> for SessionState {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Valid => SessionState::Valid,
            Verdict::Invalid(_) => SessionState::Invalid,
        }
    }
}

/// One activation of a protected route.
///
/// Dropping it unmounts it; a check that has not settled yet then has no
/// effect at all.
pub struct GuardedRoute {
    guard: SessionGuard,
    state: watch::Sender<SessionState>,
    /// Set by the one `resolve` call that runs the check.
    claimed: AtomicBool,
    unmounted: CancellationToken,
}

impl GuardedRoute {
    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// Observe state changes of this activation.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Token that unmounts this activation when cancelled.
    pub fn unmount_handle(&self) -> CancellationToken {
        self.unmounted.clone()
    }

    pub fn unmount(&self) {
        self.unmounted.cancel();
    }

    pub fn is_mounted(&self) -> bool {
        !self.unmounted.is_cancelled()
    }

    /// Run the check once. Returns `None` if the route was unmounted before
    /// the check settled; nothing is cleared, redirected, or published then.
    ///
    /// Concurrent callers share a single pass: only the first evaluates, the
    /// others wait for its result.
    pub async fn resolve(&self) -> Option<SessionState> {
        let current = self.state();
        if current != SessionState::Pending {
            return Some(current);
        }
        if self.claimed.swap(true, Ordering::AcqRel) {
            return self.settled().await;
        }

        tokio::select! {
            biased;
            _ = self.unmounted.cancelled() => {
                debug!("route unmounted before session check ran");
                return None;
            }
            _ = tokio::task::yield_now() => {}
        }

        let verdict = self.guard.evaluate();
        if !self.is_mounted() {
            debug!("route unmounted during session check; discarding result");
            return None;
        }

        self.guard.invalidate_if_needed(verdict);
        let state = SessionState::from(verdict);
        self.state.send_replace(state);
        if state == SessionState::Invalid {
            debug!(to = %self.guard.login_path, ?verdict, "redirecting to login");
            self.guard
                .navigator
                .navigate(&self.guard.login_path, NavigationMode::Replace);
        }
        Some(state)
    }

    /// Wait for the pass another caller is running.
    async fn settled(&self) -> Option<SessionState> {
        let mut updates = self.state.subscribe();
        tokio::select! {
            biased;
            settled = updates.wait_for(|s| *s != SessionState::Pending) => {
                settled.ok().map(|s| *s)
            }
            _ = self.unmounted.cancelled() => None,
        }
    }

    /// The protected content, only when the session is `Valid`.
    pub fn render<T>(&self, content: impl FnOnce() -> T) -> Option<T> {
        (self.state() == SessionState::Valid).then(content)
    }
}

impl Drop for GuardedRoute {
    fn drop(&mut self) {
        self.unmounted.cancel();
    }
}
