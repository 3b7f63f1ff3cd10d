//! Credential Store
//!
//! Persists exactly one serialized session as a JSON blob so the operator
//! stays logged in across restarts. Deliberately forgiving: a missing or
//! corrupt blob loads as "absent", and a failed write only costs the next
//! restart a login.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, warn};

/// File-backed store for the single admin session
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Overwrite the stored session. Storage unavailable is a no-op.
    pub fn save<T: Serialize>(&self, session: &T) {
        let json = match serde_json::to_string(session) {
            Ok(json) => json,
            Err(e) => {
                warn!("Session serialization failed, not persisting: {}", e);
                return;
            }
        };

        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!("Cannot create session dir {}: {}", parent.display(), e);
                return;
            }
        }

        if let Err(e) = std::fs::write(&self.path, json) {
            warn!("Session not persisted to {}: {}", self.path.display(), e);
        } else {
            debug!("Session persisted to {}", self.path.display());
        }
    }

    /// Load the last saved session. Missing file or corrupt data is `None`.
    pub fn load<T: DeserializeOwned>(&self) -> Option<T> {
        let data = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&data) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!("Stored session unreadable, treating as absent: {}", e);
                None
            }
        }
    }

    /// Remove the stored session unconditionally
    pub fn clear(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Stored session cleared"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to clear stored session: {}", e),
        }
    }
}
