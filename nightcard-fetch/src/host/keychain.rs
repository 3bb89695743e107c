//! Secure credential storage using the system keychain.
//!
//! This module provides access to the system's secure credential storage:
//! - macOS: Keychain Services
//! - Windows: Credential Manager
//! - Linux: Secret Service (GNOME Keyring, KDE Wallet)
//!
//! [`MemoryKeychain`] offers the same API without touching the system, for
//! tests and ephemeral sessions.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use keyring::Entry;
use tracing::{debug, warn};

use crate::error::KeychainError;

/// Service name prefix for `NightCard` credentials.
const SERVICE_PREFIX: &str = "nightcard";

// ============================================================================
// Keychain API Trait
// ============================================================================

/// API for secure credential storage.
#[async_trait]
pub trait KeychainApi: Send + Sync {
    /// Get a credential from the keychain.
    ///
    /// # Returns
    /// * `Ok(Some(secret))` - Credential found
    /// * `Ok(None)` - Credential not found
    /// * `Err(e)` - Error accessing keychain
    async fn get(&self, service: &str, account: &str) -> Result<Option<String>, KeychainError>;

    /// Set a credential in the keychain.
    async fn set(&self, service: &str, account: &str, secret: &str) -> Result<(), KeychainError>;

    /// Delete a credential from the keychain. Deleting a missing entry succeeds.
    async fn delete(&self, service: &str, account: &str) -> Result<(), KeychainError>;

    /// Check if a credential exists.
    async fn exists(&self, service: &str, account: &str) -> bool {
        matches!(self.get(service, account).await, Ok(Some(_)))
    }
}

// ============================================================================
// System Keychain Implementation
// ============================================================================

/// Default implementation using the system keychain via the `keyring` crate.
#[derive(Debug, Clone, Default)]
pub struct SystemKeychain;

impl SystemKeychain {
    /// Creates a new system keychain instance.
    pub fn new() -> Self {
        Self
    }

    /// Builds the full service name with prefix.
    fn full_service(service: &str) -> String {
        format!("{SERVICE_PREFIX}:{service}")
    }

    /// Creates a keyring entry.
    fn entry(service: &str, account: &str) -> Result<Entry, KeychainError> {
        let full_service = Self::full_service(service);
        Entry::new(&full_service, account).map_err(|e| KeychainError::Platform(e.to_string()))
    }
}

#[async_trait]
impl KeychainApi for SystemKeychain {
    async fn get(&self, service: &str, account: &str) -> Result<Option<String>, KeychainError> {
        debug!(service = %service, account = %account, "Getting credential from keychain");

        let entry = Self::entry(service, account)?;

        match entry.get_password() {
            Ok(secret) if !secret.is_empty() => {
                debug!(service = %service, account = %account, "Credential found");
                Ok(Some(secret))
            }
            // Empty password or no entry both mean "not found"
            Ok(_) | Err(keyring::Error::NoEntry) => {
                debug!(service = %service, account = %account, "Credential not found");
                Ok(None)
            }
            Err(e) => {
                warn!(service = %service, account = %account, error = %e, "Failed to get credential");
                Err(e.into())
            }
        }
    }

    async fn set(&self, service: &str, account: &str, secret: &str) -> Result<(), KeychainError> {
        debug!(service = %service, account = %account, "Setting credential in keychain");

        let entry = Self::entry(service, account)?;

        entry.set_password(secret).map_err(|e| {
            warn!(service = %service, account = %account, error = %e, "Failed to set credential");
            KeychainError::from(e)
        })?;

        debug!(service = %service, account = %account, "Credential stored successfully");
        Ok(())
    }

    async fn delete(&self, service: &str, account: &str) -> Result<(), KeychainError> {
        debug!(service = %service, account = %account, "Deleting credential from keychain");

        let entry = Self::entry(service, account)?;

        match entry.delete_credential() {
            Ok(()) => {
                debug!(service = %service, account = %account, "Credential deleted");
                Ok(())
            }
            Err(keyring::Error::NoEntry) => {
                debug!(service = %service, account = %account, "Credential not found (already deleted)");
                Ok(())
            }
            Err(e) => {
                warn!(service = %service, account = %account, error = %e, "Failed to delete credential");
                Err(e.into())
            }
        }
    }
}

// ============================================================================
// In-Memory Implementation
// ============================================================================

/// Keychain kept in process memory.
#[derive(Debug, Default)]
pub struct MemoryKeychain {
    entries: Mutex<HashMap<(String, String), String>>,
}

impl MemoryKeychain {
    /// Creates an empty in-memory keychain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an in-memory keychain holding one credential.
    pub fn with_entry(service: &str, account: &str, secret: &str) -> Self {
        let keychain = Self::new();
        if let Ok(mut entries) = keychain.entries.lock() {
            entries.insert((service.to_string(), account.to_string()), secret.to_string());
        }
        keychain
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<(String, String), String>>, KeychainError> {
        self.entries
            .lock()
            .map_err(|_| KeychainError::Other("in-memory keychain poisoned".to_string()))
    }
}

#[async_trait]
impl KeychainApi for MemoryKeychain {
    async fn get(&self, service: &str, account: &str) -> Result<Option<String>, KeychainError> {
        let entries = self.lock()?;
        Ok(entries
            .get(&(service.to_string(), account.to_string()))
            .filter(|s| !s.is_empty())
            .cloned())
    }

    async fn set(&self, service: &str, account: &str, secret: &str) -> Result<(), KeychainError> {
        self.lock()?
            .insert((service.to_string(), account.to_string()), secret.to_string());
        Ok(())
    }

    async fn delete(&self, service: &str, account: &str) -> Result<(), KeychainError> {
        self.lock()?
            .remove(&(service.to_string(), account.to_string()));
        Ok(())
    }
}

// ============================================================================
// Common Credential Keys
// ============================================================================

/// Common service names.
pub mod services {
    /// Google Gemini service.
    pub const GEMINI: &str = "gemini";
}

/// Common account names for credentials.
pub mod accounts {
    /// API key credential.
    pub const API_KEY: &str = "api_key";
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_service_name() {
        assert_eq!(SystemKeychain::full_service("gemini"), "nightcard:gemini");
    }

    #[tokio::test]
    async fn test_memory_keychain_roundtrip() {
        let keychain = MemoryKeychain::new();
        assert!(!keychain.exists(services::GEMINI, accounts::API_KEY).await);

        keychain
            .set(services::GEMINI, accounts::API_KEY, "secret")
            .await
            .unwrap();
        assert_eq!(
            keychain.get(services::GEMINI, accounts::API_KEY).await.unwrap(),
            Some("secret".to_string())
        );

        keychain.delete(services::GEMINI, accounts::API_KEY).await.unwrap();
        assert!(!keychain.exists(services::GEMINI, accounts::API_KEY).await);

        // Deleting twice is fine.
        keychain.delete(services::GEMINI, accounts::API_KEY).await.unwrap();
    }

    #[tokio::test]
    async fn test_memory_keychain_empty_secret_is_missing() {
        let keychain = MemoryKeychain::with_entry("gemini", "api_key", "");
        assert_eq!(keychain.get("gemini", "api_key").await.unwrap(), None);
    }

    // Note: system keychain tests need platform access and are not run here.
}
