//! Loading and saving the session state.

use nightcard_core::{STORAGE_KEY, SessionState};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::kv::{FileKeyValueStore, KeyValueStore};

/// Persists a [`SessionState`] as one JSON value in a [`KeyValueStore`].
#[derive(Clone)]
pub struct SessionStore {
    kv: Arc<dyn KeyValueStore>,
    key: String,
}

impl SessionStore {
    /// Creates a session store using the standard key.
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            key: STORAGE_KEY.to_string(),
        }
    }

    /// Uses a different key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Creates a session store backed by files in the platform data directory.
    pub fn open_default() -> Self {
        Self::new(Arc::new(FileKeyValueStore::open_default()))
    }

    /// Returns the storage key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Loads the stored state.
    ///
    /// Missing, unreadable, or malformed data yields the default state.
    /// The result always satisfies the card-count bound.
    pub async fn load(&self) -> SessionState {
        let raw = match self.kv.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.key, "No saved session, starting fresh");
                return SessionState::default();
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read saved session, starting fresh");
                return SessionState::default();
            }
        };

        match SessionState::from_json(&raw) {
            Ok(state) => {
                let state = state.normalized();
                info!(
                    remaining = state.remaining_cards(),
                    records = state.history().len(),
                    "Session loaded"
                );
                state
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Saved session is corrupt, starting fresh");
                SessionState::default()
            }
        }
    }

    /// Overwrites the stored value with `state`.
    ///
    /// # Errors
    ///
    /// Returns error if the state cannot be serialized or written.
    pub async fn save(&self, state: &SessionState) -> Result<(), StoreError> {
        let json = state.to_json()?;
        self.kv.set(&self.key, &json).await?;
        debug!(
            key = %self.key,
            remaining = state.remaining_cards(),
            records = state.history().len(),
            "Session saved"
        );
        Ok(())
    }

    /// Removes the stored value.
    ///
    /// # Errors
    ///
    /// Returns error if the backend cannot remove the value.
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.kv.remove(&self.key).await?;
        info!(key = %self.key, "Saved session cleared");
        Ok(())
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").field("key", &self.key).finish_non_exhaustive()
    }
}
