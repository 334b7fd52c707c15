//! Client-side session and authorization layer for the SimWard
//! medical-training simulator.
//!
//! This crate owns the credential lifecycle for a trainer API client:
//! durable persistence of the (token, user) pair, compact signed-token
//! payload inspection, the authoritative "is a session active"
//! decision, bearer attachment on outbound calls with 401-triggered
//! revalidation, the third-party credential exchange, and a pure
//! navigation gate.
//!
//! Collaborators (chat, dashboards, case screens) only ever touch this
//! layer through five operations: `is_active`, `current_user`,
//! `current_token`, `logout`, and an authorized `call`.
//!
//! The local expiry check decodes the token payload without verifying
//! the signature. It is a UX gate that avoids dispatching a doomed
//! request; every real authorization decision is re-checked
//! server-side.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;

pub use api::{AuthorizedClient, InterceptingClient};
pub use auth::{
    CredentialStore, FileStore, IdentityProvider, KeyringStore, LoginFlow, MemoryStore,
    RouteDecision, RouteGuard, SessionGate,
};
pub use config::{Config, StoreBackend};
pub use error::AuthError;
pub use models::{Credential, UserProfile};
