//! Navigation gating over the session verdict.

use crate::auth::SessionGate;

/// Outcome of a navigation check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Session is active - render the requested destination.
    Proceed,
    /// No active session - go to the login entry point, remembering
    /// where the visitor was headed for a post-login return.
    RedirectToLogin { return_to: Option<String> },
}

/// Pure decision over `SessionGate::is_active`; holds no state of its
/// own.
#[derive(Clone)]
pub struct RouteGuard {
    gate: SessionGate,
    login_path: String,
}

impl RouteGuard {
    pub fn new(gate: SessionGate, login_path: impl Into<String>) -> Self {
        Self {
            gate,
            login_path: login_path.into(),
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn check(&self, requested: &str) -> RouteDecision {
        if self.gate.is_active() {
            RouteDecision::Proceed
        } else {
            let return_to =
                (requested != self.login_path).then(|| requested.to_string());
            RouteDecision::RedirectToLogin { return_to }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::store::{CredentialStore, MemoryStore};
    use crate::auth::token::unsigned_token;
    use crate::models::{Credential, UserProfile};
    use serde_json::json;
    use std::sync::Arc;

    fn guard_with_session(active: bool) -> RouteGuard {
        let store = Arc::new(MemoryStore::new());
        if active {
            let token =
                unsigned_token(&json!({"exp": chrono::Utc::now().timestamp() + 3600}));
            store.write(&Credential {
                token,
                user: UserProfile {
                    id: "u1".to_string(),
                    name: "Dr. X".to_string(),
                    email: "x@example.org".to_string(),
                    picture: None,
                },
            });
        }
        let gate = SessionGate::new(store, reqwest::Client::new(), "http://localhost:0");
        RouteGuard::new(gate, "/login")
    }

    #[test]
    fn test_active_session_proceeds() {
        let guard = guard_with_session(true);
        assert_eq!(guard.check("/cases/42"), RouteDecision::Proceed);
    }

    #[test]
    fn test_inactive_session_redirects_with_return_destination() {
        let guard = guard_with_session(false);
        assert_eq!(
            guard.check("/cases/42"),
            RouteDecision::RedirectToLogin {
                return_to: Some("/cases/42".to_string())
            }
        );
    }

    #[test]
    fn test_login_destination_does_not_loop() {
        let guard = guard_with_session(false);
        assert_eq!(
            guard.check("/login"),
            RouteDecision::RedirectToLogin { return_to: None }
        );
    }
}
