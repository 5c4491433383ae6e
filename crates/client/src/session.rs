//! Durable local session state.
//!
//! One JSON file holds everything the submission policy needs to survive a
//! restart: the session id, the last successful submission time, the one-shot
//! marker, and the warm-up cache. The three markers are independent; clearing
//! one never clears another.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;
use whisper_core::{Error, Result};

/// Persisted policy state for one client lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    /// Random, generated once per client lifetime
    pub session_id: String,
    /// Unix ms of the last successful submission
    pub last_submission_ms: Option<u64>,
    /// One-shot marker, set after the first success
    pub has_submitted: bool,
    /// Unix ms of the last completed warm-up
    pub warmed_up_at_ms: Option<u64>,
}

impl SessionState {
    fn new() -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            last_submission_ms: None,
            has_submitted: false,
            warmed_up_at_ms: None,
        }
    }
}

/// File-backed store for [`SessionState`].
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Load existing state or create a fresh one and persist it.
    ///
    /// A corrupt file is discarded with a warning rather than bricking the
    /// client; the policy markers it held are soft controls, not integrity
    /// guarantees.
    pub fn open(path: impl AsRef<Path>) -> Result<(Self, SessionState)> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
        };

        let state = match fs::read_to_string(&store.path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(state) => state,
                Err(e) => {
                    warn!(path = %store.path.display(), error = %e, "Corrupt session state, starting fresh");
                    let state = SessionState::new();
                    store.save(&state)?;
                    state
                }
            },
            Err(_) => {
                let state = SessionState::new();
                store.save(&state)?;
                state
            }
        };

        Ok((store, state))
    }

    /// Persist the state. Write-then-rename so a crash mid-write cannot
    /// leave a truncated file behind.
    pub fn save(&self, state: &SessionState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| Error::internal(format!("Failed to create state dir: {}", e)))?;
            }
        }

        let raw = serde_json::to_string_pretty(state)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, raw)
            .map_err(|e| Error::internal(format!("Failed to write session state: {}", e)))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| Error::internal(format!("Failed to persist session state: {}", e)))?;

        Ok(())
    }
}
