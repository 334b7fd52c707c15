//! Durable credential persistence.
//!
//! One record holds the (token, user) pair so both halves are written
//! and cleared together. Every primitive fails soft: a storage problem
//! is logged and reported as absence, never propagated to callers.

use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::warn;

use crate::models::Credential;

/// Credential file name inside the profile directory
const CREDENTIAL_FILE: &str = "credential.json";

/// Keychain service name for the keyring-backed store
const SERVICE_NAME: &str = "simward";

/// Keychain entry name holding the serialized credential
const ENTRY_NAME: &str = "session";

pub trait CredentialStore: Send + Sync {
    /// Persist the pair. Failures are logged and swallowed.
    fn write(&self, credential: &Credential);

    /// Read the pair back. Absent on any failure, including a record
    /// that no longer deserializes.
    fn read(&self) -> Option<Credential>;

    /// Remove the pair. Idempotent.
    fn clear(&self);
}

/// File-backed store under a profile directory; survives restarts.
pub struct FileStore {
    profile_dir: PathBuf,
}

impl FileStore {
    pub fn new(profile_dir: PathBuf) -> Self {
        Self { profile_dir }
    }

    fn credential_path(&self) -> PathBuf {
        self.profile_dir.join(CREDENTIAL_FILE)
    }

    fn try_write(&self, credential: &Credential) -> Result<()> {
        std::fs::create_dir_all(&self.profile_dir)
            .context("Failed to create profile directory")?;
        let contents = serde_json::to_string_pretty(credential)?;
        std::fs::write(self.credential_path(), contents)
            .context("Failed to write credential file")?;
        Ok(())
    }

    fn try_read(&self) -> Result<Option<Credential>> {
        let path = self.credential_path();
        if !path.exists() {
            return Ok(None);
        }

        let contents =
            std::fs::read_to_string(&path).context("Failed to read credential file")?;
        let credential =
            serde_json::from_str(&contents).context("Failed to parse credential file")?;
        Ok(Some(credential))
    }
}

impl CredentialStore for FileStore {
    fn write(&self, credential: &Credential) {
        if let Err(e) = self.try_write(credential) {
            warn!(error = %e, "Failed to persist credential");
        }
    }

    fn read(&self) -> Option<Credential> {
        match self.try_read() {
            Ok(credential) => credential,
            Err(e) => {
                warn!(error = %e, "Failed to load credential, treating as absent");
                None
            }
        }
    }

    fn clear(&self) {
        let path = self.credential_path();
        if path.exists() {
            if let Err(e) = std::fs::remove_file(&path) {
                warn!(error = %e, "Failed to remove credential file");
            }
        }
    }
}

/// OS keychain store; the serialized pair is one secret.
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
        }
    }

    fn entry(&self) -> Result<keyring::Entry> {
        keyring::Entry::new(&self.service, ENTRY_NAME)
            .context("Failed to create keyring entry")
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for KeyringStore {
    fn write(&self, credential: &Credential) {
        let result = self.entry().and_then(|entry| {
            let contents = serde_json::to_string(credential)?;
            entry
                .set_password(&contents)
                .context("Failed to store credential in keychain")
        });
        if let Err(e) = result {
            warn!(error = %e, "Failed to persist credential");
        }
    }

    fn read(&self) -> Option<Credential> {
        let entry = match self.entry() {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Failed to open keychain, treating as absent");
                return None;
            }
        };

        match entry.get_password() {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(credential) => Some(credential),
                Err(e) => {
                    warn!(error = %e, "Stored credential no longer parses, treating as absent");
                    None
                }
            },
            Err(keyring::Error::NoEntry) => None,
            Err(e) => {
                warn!(error = %e, "Failed to read keychain, treating as absent");
                None
            }
        }
    }

    fn clear(&self) {
        let result = self.entry().and_then(|entry| match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete credential from keychain"),
        });
        if let Err(e) = result {
            warn!(error = %e, "Failed to clear keychain credential");
        }
    }
}

/// In-memory store for tests and embedded use.
#[derive(Default)]
pub struct MemoryStore {
    slot: Mutex<Option<Credential>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryStore {
    fn write(&self, credential: &Credential) {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(credential.clone());
    }

    fn read(&self) -> Option<Credential> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn clear(&self) {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

// ============================================================================
// Tests
// ============================================================================
