//! Third-party credential exchange.
//!
//! In the shipped product the identity provider is a hosted sign-in
//! widget. Here it sits behind a trait and is awaited under a bounded
//! timeout, so a torn-down login screen cannot leave a dangling poll
//! running, and mounting two flows cannot collide on a global
//! callback.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::auth::store::CredentialStore;
use crate::error::AuthError;
use crate::models::{Credential, UserProfile};

/// Exchange endpoint path. Allowlisted - the exchange call never
/// carries a bearer header of its own.
const EXCHANGE_PATH: &str = "/api/auth/google";

/// Bound on waiting for the identity provider to produce a credential
const DEFAULT_READY_TIMEOUT: Duration = Duration::from_secs(30);

/// Source of an opaque third-party identity credential.
pub trait IdentityProvider {
    /// Resolve once with the credential, or fail if the provider
    /// cannot be reached.
    fn obtain_credential(
        &self,
    ) -> impl std::future::Future<Output = Result<String, AuthError>> + Send;
}

#[derive(Debug, Deserialize)]
struct ExchangeResponse {
    token: String,
    user: UserProfile,
}

/// Bridges an identity provider to an application credential.
pub struct LoginFlow<P> {
    provider: P,
    store: Arc<dyn CredentialStore>,
    http: reqwest::Client,
    base_url: String,
    ready_timeout: Duration,
}

impl<P: IdentityProvider> LoginFlow<P> {
    pub fn new(
        provider: P,
        store: Arc<dyn CredentialStore>,
        http: reqwest::Client,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            store,
            http,
            base_url: base_url.into(),
            ready_timeout: DEFAULT_READY_TIMEOUT,
        }
    }

    pub fn with_ready_timeout(mut self, timeout: Duration) -> Self {
        self.ready_timeout = timeout;
        self
    }

    /// Run the flow end to end: obtain the third-party credential,
    /// exchange it for an application session, persist the pair.
    ///
    /// On any failure the stored credential is left untouched - there
    /// is no partial write.
    pub async fn login(&self) -> Result<UserProfile, AuthError> {
        let third_party =
            tokio::time::timeout(self.ready_timeout, self.provider.obtain_credential())
                .await
                .map_err(|_| {
                    warn!("Identity provider did not produce a credential in time");
                    AuthError::ProviderUnavailable
                })??;

        let user = self.exchange(&third_party).await?;
        info!(user = %user.id, "Login exchange succeeded");
        Ok(user)
    }

    async fn exchange(&self, third_party: &str) -> Result<UserProfile, AuthError> {
        let url = format!("{}{}", self.base_url, EXCHANGE_PATH);
        let response = self
            .http
            .post(&url)
            .json(&json!({ "token": third_party }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::exchange_failed(status, &body));
        }

        let exchange: ExchangeResponse = response.json().await.map_err(|e| {
            AuthError::ExchangeFailed(format!("Unreadable exchange response: {e}"))
        })?;

        self.store.write(&Credential {
            token: exchange.token,
            user: exchange.user.clone(),
        });
        Ok(exchange.user)
    }
}
