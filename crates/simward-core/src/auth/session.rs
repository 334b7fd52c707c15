//! Session state decisions.
//!
//! Two states only: Unauthenticated and Authenticated. The verdict is
//! re-derived from storage on every call, never cached, so there is no
//! invalidation problem. An expired session is immediately
//! Unauthenticated; nothing here renews tokens.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::auth::store::CredentialStore;
use crate::auth::token;
use crate::error::AuthError;
use crate::models::UserProfile;

/// Validation endpoint path
const VALIDATE_PATH: &str = "/api/auth/validate";

#[derive(Debug, Deserialize)]
struct ValidateResponse {
    valid: bool,
}

/// The authoritative "is a session active" decision.
/// Clone is cheap - the store is shared and reqwest::Client uses Arc
/// internally for connection pooling.
#[derive(Clone)]
pub struct SessionGate {
    store: Arc<dyn CredentialStore>,
    http: reqwest::Client,
    base_url: String,
}

impl SessionGate {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        http: reqwest::Client,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            store,
            http,
            base_url: base_url.into(),
        }
    }

    /// Whether the current visitor holds a live session.
    ///
    /// Fail-safe: a credential whose payload does not decode, or whose
    /// expiry claim is missing or not strictly in the future, is
    /// cleared on the spot and reported as inactive. Malformed and
    /// near-expiry tokens deliberately collapse to the same verdict.
    pub fn is_active(&self) -> bool {
        let Some(credential) = self.store.read() else {
            return false;
        };

        let payload = match token::decode_payload(&credential.token) {
            Ok(payload) => payload,
            Err(_) => {
                debug!("Stored token is malformed, clearing session");
                self.store.clear();
                return false;
            }
        };

        match payload.expires_at() {
            Some(expiry) if expiry > chrono::Utc::now() => true,
            _ => {
                debug!("Stored token is expired or carries no expiry, clearing session");
                self.store.clear();
                false
            }
        }
    }

    /// Profile of the active session. None whenever `is_active` is
    /// false, even if stale bytes remain in storage.
    pub fn current_user(&self) -> Option<UserProfile> {
        if !self.is_active() {
            return None;
        }
        self.store.read().map(|credential| credential.user)
    }

    /// Token of the active session, gated the same way as
    /// `current_user`.
    pub fn current_token(&self) -> Option<String> {
        if !self.is_active() {
            return None;
        }
        self.store.read().map(|credential| credential.token)
    }

    /// Unconditional clear. Idempotent.
    pub fn logout(&self) {
        self.store.clear();
    }

    /// Ask the server for its verdict on the stored token.
    ///
    /// Secondary check only, used after a rejected authorized call -
    /// never the primary gate, to avoid a network round trip on every
    /// render decision.
    pub async fn remote_validate(&self) -> Result<bool, AuthError> {
        let Some(credential) = self.store.read() else {
            return Ok(false);
        };

        let url = format!("{}{}", self.base_url, VALIDATE_PATH);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&credential.token)
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "Validation endpoint rejected the request");
            return Ok(false);
        }

        let verdict: ValidateResponse = response.json().await?;
        Ok(verdict.valid)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::store::MemoryStore;
    use crate::auth::token::unsigned_token;
    use crate::models::Credential;
    use serde_json::json;

    fn profile() -> UserProfile {
        UserProfile {
            id: "u1".to_string(),
            name: "Dr. X".to_string(),
            email: "x@example.org".to_string(),
            picture: None,
        }
    }

    fn gate_with(credential: Option<Credential>) -> (SessionGate, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        if let Some(credential) = credential {
            store.write(&credential);
        }
        let gate = SessionGate::new(
            store.clone(),
            reqwest::Client::new(),
            "http://localhost:0",
        );
        (gate, store)
    }

    fn future_token() -> String {
        unsigned_token(&json!({"exp": chrono::Utc::now().timestamp() + 3600, "sub": "u1"}))
    }

    #[test]
    fn test_absent_credential_is_inactive() {
        let (gate, _store) = gate_with(None);
        assert!(!gate.is_active());
        assert!(gate.current_user().is_none());
        assert!(gate.current_token().is_none());
    }

    #[test]
    fn test_valid_credential_is_active() {
        let token = future_token();
        let (gate, _store) = gate_with(Some(Credential {
            token: token.clone(),
            user: profile(),
        }));

        assert!(gate.is_active());
        assert_eq!(gate.current_token(), Some(token));
        assert_eq!(gate.current_user(), Some(profile()));
    }

    #[test]
    fn test_expired_token_is_inactive_and_cleared() {
        let token = unsigned_token(&json!({"exp": chrono::Utc::now().timestamp() - 60}));
        let (gate, store) = gate_with(Some(Credential {
            token,
            user: profile(),
        }));

        assert!(!gate.is_active());
        // Clearing is observable through the store.
        assert!(store.read().is_none());
    }

    #[test]
    fn test_malformed_token_is_inactive_and_cleared() {
        let (gate, store) = gate_with(Some(Credential {
            token: "garbage".to_string(),
            user: profile(),
        }));

        assert!(!gate.is_active());
        assert!(store.read().is_none());
        assert!(gate.current_user().is_none());
    }

    #[test]
    fn test_token_without_exp_is_inactive_and_cleared() {
        let token = unsigned_token(&json!({"sub": "u1"}));
        let (gate, store) = gate_with(Some(Credential {
            token,
            user: profile(),
        }));

        assert!(!gate.is_active());
        assert!(store.read().is_none());
    }

    #[test]
    fn test_logout_is_idempotent() {
        let (gate, store) = gate_with(Some(Credential {
            token: future_token(),
            user: profile(),
        }));

        gate.logout();
        assert!(store.read().is_none());
        gate.logout();
        assert!(store.read().is_none());
        assert!(!gate.is_active());
    }
}
