//! # scola_core
//!
//! Client-side session gate for the Scola school portal.
//!
//! The gate decides, per navigation, whether a protected page is shown or the
//! user is sent back to the login screen. It is a UX convenience: every
//! protected backend endpoint re-validates the bearer token on its own.

pub mod auth;
pub mod clock;
pub mod config;
pub mod guard;
pub mod login;
pub mod models;
pub mod navigation;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
