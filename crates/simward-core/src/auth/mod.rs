//! Authentication module for managing the session credential.
//!
//! This module provides:
//! - `CredentialStore`: durable persistence of the (token, user) pair
//! - token payload inspection (decode-only, no signature check)
//! - `SessionGate`: the authoritative "is a session active" decision
//! - `LoginFlow`: third-party credential exchange
//! - `RouteGuard`: navigation gating over the session verdict

pub mod guard;
pub mod login;
pub mod session;
pub mod store;
pub mod token;

pub use guard::{RouteDecision, RouteGuard};
pub use login::{IdentityProvider, LoginFlow};
pub use session::SessionGate;
pub use store::{CredentialStore, FileStore, KeyringStore, MemoryStore};
