//! Post-login role dispatch.
//!
//! The role is a client-side routing hint taken from the subject suffix. It
//! grants nothing; the backend authorizes every request itself.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::AuthError;
use crate::navigation::{NavigationMode, Navigator};

/// The five portal audiences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Parent,
    Student,
    Admin,
    Teacher,
    Chef,
}

/// Subject suffixes in match order. First match wins.
const SUFFIXES: [(&str, Role); 5] = [
    (".parent", Role::Parent),
    (".student", Role::Student),
    (".admin", Role::Admin),
    (".prof", Role::Teacher),
    (".chef", Role::Chef),
];

impl Role {
    /// Resolve the role tagged at the end of a token subject.
    pub fn from_subject(subject: &str) -> Result<Self, AuthError> {
        let subject = subject.to_lowercase();
        SUFFIXES
            .iter()
            .find(|(suffix, _)| subject.ends_with(suffix))
            .map(|(_, role)| *role)
            .ok_or(AuthError::UnknownRole(subject))
    }

    /// Landing page for this role.
    pub fn home(self) -> &'static str {
        match self {
            Role::Parent => "/parent",
            Role::Student => "/student",
            Role::Admin => "/admin",
            Role::Teacher => "/teacher",
            Role::Chef => "/chef",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Parent => "parent",
            Role::Student => "student",
            Role::Admin => "admin",
            Role::Teacher => "teacher",
            Role::Chef => "chef",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role table in match order: `(subject suffix, role, home path)`.
pub fn role_destinations() -> impl Iterator<Item = (&'static str, Role, &'static str)> {
    SUFFIXES
        .iter()
        .map(|(suffix, role)| (*suffix, *role, role.home()))
}

/// Sends a freshly logged-in user to their role's home.
#[derive(Clone)]
pub struct RoleRouter {
    navigator: Arc<dyn Navigator>,
}

impl RoleRouter {
    pub fn new(navigator: Arc<dyn Navigator>) -> Self {
        Self { navigator }
    }

    /// Destination for `subject`, without navigating.
    pub fn route_for(subject: &str) -> Result<&'static str, AuthError> {
        Role::from_subject(subject).map(Role::home)
    }

    /// Navigate to the role home. Exactly one push on success, none on error.
    pub fn dispatch(&self, subject: &str) -> Result<Role, AuthError> {
        let role = Role::from_subject(subject)?;
        debug!(%role, to = role.home(), "dispatching to role home");
        self.navigator.navigate(role.home(), NavigationMode::Push);
        Ok(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::History;

    #[test]
    fn every_suffix_maps_to_its_home() {
        let cases = [
            ("jane.doe.parent", "/parent"),
            ("tom.student", "/student"),
            ("root.admin", "/admin"),
            ("bob.prof", "/teacher"),
            ("marie.chef", "/chef"),
        ];
        for (subject, home) in cases {
            assert_eq!(RoleRouter::route_for(subject).unwrap(), home, "{subject}");
        }
    }

    #[test]
    fn subject_is_lower_cased_before_matching() {
        assert_eq!(Role::from_subject("Bob.PROF").unwrap(), Role::Teacher);
    }

    #[test]
    fn unknown_suffix_is_an_error() {
        for subject in ["bob.intern", "parent", "bob.parents", "bob.parent.x", ""] {
            match Role::from_subject(subject) {
                Err(AuthError::UnknownRole(_)) => {}
                other => panic!("expected UnknownRole for {subject:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn dispatch_pushes_once() {
        let history = Arc::new(History::starting_at("/login"));
        let router = RoleRouter::new(history.clone());

        assert_eq!(router.dispatch("bob.prof").unwrap(), Role::Teacher);
        assert_eq!(history.entries(), vec!["/login", "/teacher"]);
    }

    #[test]
    fn failed_dispatch_does_not_navigate() {
        let history = Arc::new(History::starting_at("/login"));
        let router = RoleRouter::new(history.clone());

        assert!(router.dispatch("bob.intern").is_err());
        assert_eq!(history.entries(), vec!["/login"]);
    }

    #[test]
    fn destination_table_keeps_match_order() {
        let roles: Vec<Role> = role_destinations().map(|(_, role, _)| role).collect();
        assert_eq!(
            roles,
            vec![Role::Parent, Role::Student, Role::Admin, Role::Teacher, Role::Chef]
        );
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Teacher).unwrap(), "\"teacher\"");
        assert_eq!(Role::Chef.to_string(), "chef");
    }
}
