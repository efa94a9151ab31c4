//! Session gate configuration.

use time::Duration;

/// Lifetime of a backend-issued token: 1/8 day.
pub const BACKEND_TOKEN_LIFETIME_HOURS: i64 = 3;

/// Cookie lifetime, matching the backend token lifetime.
pub const DEFAULT_SESSION_TTL_HOURS: i64 = BACKEND_TOKEN_LIFETIME_HOURS;

/// Route the guard redirects to when a session is not usable.
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Configuration shared by the guard, the login flow and the session store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Lifetime of the persisted session cookies.
    pub ttl: Duration,
    /// Destination of the fail-closed redirect.
    pub login_path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::hours(DEFAULT_SESSION_TTL_HOURS),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
        }
    }
}

impl SessionConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable                  | Default  |
    /// |---------------------------|----------|
    /// | `SCOLA_SESSION_TTL_HOURS` | `3`      |
    /// | `SCOLA_LOGIN_PATH`        | `/login` |
    ///
    /// The TTL never exceeds the backend token lifetime.
    pub fn from_env() -> Self {
        Self {
            ttl: ttl_from_hours(std::env::var("SCOLA_SESSION_TTL_HOURS").ok().as_deref()),
            login_path: std::env::var("SCOLA_LOGIN_PATH")
                .ok()
                .filter(|p| p.starts_with('/'))
                .unwrap_or_else(|| DEFAULT_LOGIN_PATH.into()),
        }
    }
}

/// Parse a TTL in whole hours, capped at the backend token lifetime.
/// Unparsable or non-positive values give the default.
fn ttl_from_hours(raw: Option<&str>) -> Duration {
    let hours = raw
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|h| *h > 0)
        .map_or(DEFAULT_SESSION_TTL_HOURS, |h| {
            h.min(BACKEND_TOKEN_LIFETIME_HOURS)
        });
    Duration::hours(hours)
}
