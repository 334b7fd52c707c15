//! Authorized API client.
//!
//! Attaches the bearer credential to outbound calls and interprets
//! exactly one status: a 401 triggers a server-side revalidation and,
//! when the session is confirmed dead, a forced logout. Every other
//! response passes through unmodified. No timeout, retry, or backoff
//! lives here - callers own that policy, and retrying an
//! expired-session call would only repeat the same rejection.

use reqwest::{Method, Response, StatusCode};
use serde::Serialize;
use tracing::{debug, warn};

use crate::auth::SessionGate;
use crate::error::AuthError;

/// Client for bearer-authorized calls against the trainer API.
/// Clone is cheap - reqwest::Client uses Arc internally for connection
/// pooling.
#[derive(Clone)]
pub struct AuthorizedClient {
    gate: SessionGate,
    http: reqwest::Client,
    base_url: String,
}

impl AuthorizedClient {
    pub fn new(
        gate: SessionGate,
        http: reqwest::Client,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            gate,
            http,
            base_url: base_url.into(),
        }
    }

    pub async fn get(&self, path: &str) -> Result<Response, AuthError> {
        self.call(Method::GET, path, None::<&()>).await
    }

    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<Response, AuthError> {
        self.call(Method::POST, path, Some(body)).await
    }

    /// Issue one authorized call.
    ///
    /// Never dispatches while inactive. Concurrent calls that both hit
    /// a 401 may each revalidate; logout is idempotent, so the second
    /// verdict is wasted work, not a hazard.
    pub async fn call<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, AuthError> {
        if !self.gate.is_active() {
            return Err(AuthError::NotAuthenticated);
        }
        let token = self
            .gate
            .current_token()
            .ok_or(AuthError::NotAuthenticated)?;

        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.request(method, &url).bearer_auth(&token);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        debug!(path, "Call rejected with 401, revalidating session");
        if self.gate.remote_validate().await? {
            // Transient server-side glitch: hand the original
            // rejection back untouched, no retry.
            Ok(response)
        } else {
            warn!(path, "Server confirmed the session is invalid, logging out");
            self.gate.logout();
            Err(AuthError::SessionExpired)
        }
    }
}
