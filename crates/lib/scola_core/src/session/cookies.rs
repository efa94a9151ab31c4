//! Cookie-jar session store.
//!
//! Holds two cookies, `scola_token` and `scola_username`, with a shared
//! expiry. Like a browser jar, cookies past their `Expires` are not returned.
//! The file-backed variant stores one percent-encoded `Set-Cookie` line per
//! cookie.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use axum_extra::extract::cookie::{Cookie, SameSite};
use time::{Duration, OffsetDateTime};
use tracing::{debug, warn};

use super::{SessionError, SessionStore, StoredSession};

/// Cookie name for the bearer token.
pub const TOKEN_COOKIE: &str = "scola_token";
/// Cookie name for the lower-cased username.
pub const USERNAME_COOKIE: &str = "scola_username";

type Jar = BTreeMap<String, Cookie<'static>>;

/// Session store backed by a cookie jar, optionally persisted to a file.
#[derive(Debug)]
pub struct CookieSessionStore {
    jar: Mutex<Jar>,
    path: Option<PathBuf>,
}

impl CookieSessionStore {
    /// A jar that lives only as long as this value.
    pub fn in_memory() -> Self {
        Self {
            jar: Mutex::new(Jar::new()),
            path: None,
        }
    }

    /// Open the jar persisted at `path`. A missing file is an empty jar.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let jar = match std::fs::read_to_string(&path) {
            Ok(contents) => parse_jar(&contents, &path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Jar::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), cookies = jar.len(), "opened session jar");
        Ok(Self {
            jar: Mutex::new(jar),
            path: Some(path),
        })
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn lock(&self) -> MutexGuard<'_, Jar> {
        self.jar.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, jar: &Jar) -> Result<(), SessionError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if jar.is_empty() {
            return match std::fs::remove_file(path) {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            };
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents: String = jar.values().map(|c| format!("{}\n", c.encoded())).collect();
        std::fs::write(path, contents)?;
        Ok(())
    }
}

impl SessionStore for CookieSessionStore {
    fn read(&self) -> Option<StoredSession> {
        let jar = self.lock();
        let now = OffsetDateTime::now_utc();
        let live = |name: &str| {
            jar.get(name)
                .filter(|c| !is_expired(c, now))
                .map(|c| c.value().to_string())
        };
        live(TOKEN_COOKIE).map(|token| StoredSession {
            token,
            username: live(USERNAME_COOKIE),
        })
    }

    fn save(&self, token: &str, username: &str, ttl: Duration) -> Result<(), SessionError> {
        let expires = OffsetDateTime::now_utc()
            .checked_add(ttl)
            .ok_or_else(|| SessionError::Cookie(format!("expiry out of range for ttl {ttl}")))?;
        let mut jar = self.lock();
        jar.insert(TOKEN_COOKIE.into(), session_cookie(TOKEN_COOKIE, token, ttl, expires));
        jar.insert(
            USERNAME_COOKIE.into(),
            session_cookie(USERNAME_COOKIE, username, ttl, expires),
        );
        debug!(username, %expires, "session saved");
        self.persist(&jar)
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut jar = self.lock();
        jar.remove(TOKEN_COOKIE);
        jar.remove(USERNAME_COOKIE);
        debug!("session cleared");
        self.persist(&jar)
    }
}

fn session_cookie(
    name: &'static str,
    value: &str,
    ttl: Duration,
    expires: OffsetDateTime,
) -> Cookie<'static> {
    Cookie::build((name, value.to_string()))
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(ttl)
        .expires(expires)
        .build()
}

fn is_expired(cookie: &Cookie<'_>, now: OffsetDateTime) -> bool {
    cookie.expires_datetime().is_some_and(|at| at <= now)
}

fn parse_jar(contents: &str, path: &Path) -> Jar {
    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match Cookie::parse_encoded(line.to_string()) {
            Ok(cookie) => Some((cookie.name().to_string(), cookie)),
            Err(e) => {
                warn!(path = %path.display(), "skipping unreadable session cookie: {e}");
                None
            }
        })
        .collect()
}
