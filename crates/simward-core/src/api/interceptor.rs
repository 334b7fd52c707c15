//! Bearer attachment for calls that do not go through
//! `AuthorizedClient`.
//!
//! The shipped product patched the ambient fetch primitive once at
//! startup, for the lifetime of the page. Here the same policy is an
//! explicit client object injected into collaborators, so the
//! allowlist is testable in isolation and nothing mutates process-wide
//! state.

use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Request, Response};
use tracing::{debug, warn};

use crate::auth::SessionGate;

/// Paths that must succeed without a session and never carry a bearer
/// header, not even a stale one.
const ALLOWLIST: &[&str] = &["/api/auth/google", "/api/health"];

/// Prefix identifying calls bound for the trainer API
const API_PREFIX: &str = "/api";

/// Ambient-call replacement that applies the bearer policy per path.
#[derive(Clone)]
pub struct InterceptingClient {
    gate: SessionGate,
    http: reqwest::Client,
}

impl InterceptingClient {
    pub fn new(gate: SessionGate, http: reqwest::Client) -> Self {
        Self { gate, http }
    }

    /// Whether a request path should receive the bearer header.
    /// Pure path policy - session state is consulted separately.
    pub fn requires_bearer(path: &str) -> bool {
        path.starts_with(API_PREFIX) && !ALLOWLIST.contains(&path)
    }

    pub async fn get(&self, url: &str) -> Result<Response, reqwest::Error> {
        let request = self.http.get(url).build()?;
        self.execute(request).await
    }

    /// Execute a request, attaching the bearer header when the path
    /// calls for one and a session is active. Everything else passes
    /// through unchanged.
    pub async fn execute(&self, mut request: Request) -> Result<Response, reqwest::Error> {
        if Self::requires_bearer(request.url().path()) {
            if let Some(token) = self.gate.current_token() {
                match HeaderValue::from_str(&format!("Bearer {token}")) {
                    Ok(value) => {
                        debug!(path = request.url().path(), "Attaching bearer header");
                        request.headers_mut().insert(AUTHORIZATION, value);
                    }
                    Err(e) => {
                        // Unattachable token; the server will reject
                        // the call and the 401 path takes over.
                        warn!(error = %e, "Stored token is not a valid header value");
                    }
                }
            }
        }
        self.http.execute(request).await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_paths_require_bearer() {
        assert!(InterceptingClient::requires_bearer("/api/cases"));
        assert!(InterceptingClient::requires_bearer("/api/auth/validate"));
        assert!(InterceptingClient::requires_bearer("/api/auth/test"));
    }

    #[test]
    fn test_allowlisted_paths_never_require_bearer() {
        assert!(!InterceptingClient::requires_bearer("/api/auth/google"));
        assert!(!InterceptingClient::requires_bearer("/api/health"));
    }

    #[test]
    fn test_non_api_paths_pass_through() {
        assert!(!InterceptingClient::requires_bearer("/static/logo.png"));
        assert!(!InterceptingClient::requires_bearer("/"));
    }
}
