//! simward - diagnostic command-line client for the trainer API.
//!
//! Provides quick checks of the session layer from a shell:
//!
//! ```text
//! simward status              local session verdict, no network
//! simward login <credential>  exchange a third-party credential
//! simward validate            ask the server for its verdict
//! simward probe               authorized call to /api/auth/test
//! simward health              unauthenticated health check
//! simward logout              clear the stored credential
//! ```

use std::io;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use simward_core::auth::token;
use simward_core::{
    AuthError, AuthorizedClient, Config, CredentialStore, FileStore, IdentityProvider,
    InterceptingClient, KeyringStore, LoginFlow, SessionGate, StoreBackend,
};

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Provider that hands over a credential supplied on the command line.
struct ArgProvider {
    credential: String,
}

impl IdentityProvider for ArgProvider {
    async fn obtain_credential(&self) -> Result<String, AuthError> {
        Ok(self.credential.clone())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();
    init_tracing();
    info!("simward starting");

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or("status");

    let config = Config::load()?;
    let store: Arc<dyn CredentialStore> = match config.store_backend {
        StoreBackend::File => Arc::new(FileStore::new(config.profile_dir()?)),
        StoreBackend::Keyring => Arc::new(KeyringStore::new()),
    };
    let http = reqwest::Client::new();
    let gate = SessionGate::new(store.clone(), http.clone(), config.base_url.clone());

    match command {
        "status" => status(&gate),
        "login" => match args.get(2) {
            Some(credential) => login(&config, store, &http, credential).await,
            None => usage(),
        },
        "validate" => validate(&gate).await,
        "probe" => probe(&config, &gate, &http).await,
        "health" => health(&config, &gate, &http).await,
        "logout" => {
            gate.logout();
            println!("Logged out.");
            Ok(())
        }
        _ => usage(),
    }
}

fn usage() -> Result<()> {
    eprintln!("Usage: simward [status|login <credential>|validate|probe|health|logout]");
    std::process::exit(2);
}

fn status(gate: &SessionGate) -> Result<()> {
    match (gate.current_user(), gate.current_token()) {
        (Some(user), Some(token_str)) => {
            println!("Logged in as {} <{}>", user.name, user.email);
            if let Some(expiry) =
                token::decode_payload(&token_str).ok().and_then(|p| p.expires_at())
            {
                println!("Session expires at {}", expiry.to_rfc3339());
            }
        }
        _ => println!("Not logged in."),
    }
    Ok(())
}

async fn login(
    config: &Config,
    store: Arc<dyn CredentialStore>,
    http: &reqwest::Client,
    credential: &str,
) -> Result<()> {
    let flow = LoginFlow::new(
        ArgProvider {
            credential: credential.to_string(),
        },
        store,
        http.clone(),
        config.base_url.clone(),
    );

    match flow.login().await {
        Ok(user) => {
            println!("Welcome, {}.", user.name);
            Ok(())
        }
        Err(AuthError::ExchangeFailed(reason)) => {
            eprintln!("Login failed: {reason}");
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

async fn validate(gate: &SessionGate) -> Result<()> {
    let verdict = gate.remote_validate().await?;
    if verdict {
        println!("Server verdict: session is valid.");
    } else {
        println!("Server verdict: session is not valid.");
    }
    Ok(())
}

async fn probe(config: &Config, gate: &SessionGate, http: &reqwest::Client) -> Result<()> {
    let client = AuthorizedClient::new(gate.clone(), http.clone(), config.base_url.clone());

    match client.get("/api/auth/test").await {
        Ok(response) => {
            let status = response.status();
            let body: serde_json::Value = response.json().await.unwrap_or_default();
            println!("Status {status}");
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(())
        }
        Err(AuthError::NotAuthenticated) => {
            println!("Not logged in.");
            Ok(())
        }
        Err(AuthError::SessionExpired) => {
            println!("Session expired - please log in again.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn health(config: &Config, gate: &SessionGate, http: &reqwest::Client) -> Result<()> {
    let client = InterceptingClient::new(gate.clone(), http.clone());
    let url = format!("{}/api/health", config.base_url);

    let response = client.get(&url).await?;
    println!("Status {}", response.status());
    Ok(())
}
