//! API key resolution.
//!
//! Lookup order:
//!
//! 1. An explicit key, when one was supplied
//! 2. Environment variables, in order (first non-empty wins)
//! 3. System keychain (`nightcard:gemini` / `api_key`)

use std::sync::Arc;

use nightcard_fetch::KeychainApi;
use nightcard_fetch::host::keychain::{accounts, services};
use tracing::{debug, warn};

/// Environment variables checked for an API key, in order.
pub const DEFAULT_API_KEY_ENV_VARS: &[&str] = &["NIGHTCARD_API_KEY", "API_KEY", "GEMINI_API_KEY"];

/// Where to look for the Gemini API key.
#[derive(Clone)]
pub struct ApiKeySource {
    explicit: Option<String>,
    env_vars: Vec<String>,
    keychain: Option<Arc<dyn KeychainApi>>,
}

impl ApiKeySource {
    /// Checks the default environment variables, then the keychain.
    pub fn new(keychain: Arc<dyn KeychainApi>) -> Self {
        Self {
            explicit: None,
            env_vars: DEFAULT_API_KEY_ENV_VARS.iter().map(ToString::to_string).collect(),
            keychain: Some(keychain),
        }
    }

    /// Checks only the given environment variables.
    pub fn env_only(env_vars: Vec<String>) -> Self {
        Self {
            explicit: None,
            env_vars,
            keychain: None,
        }
    }

    /// Always resolves to `key`.
    pub fn explicit(key: impl Into<String>) -> Self {
        Self {
            explicit: Some(key.into()),
            env_vars: Vec::new(),
            keychain: None,
        }
    }

    /// Checks `var` before the other environment variables.
    #[must_use]
    pub fn with_preferred_env(mut self, var: impl Into<String>) -> Self {
        let var = var.into();
        self.env_vars.retain(|v| *v != var);
        self.env_vars.insert(0, var);
        self
    }

    /// Environment variables checked, in order.
    pub fn env_vars(&self) -> &[String] {
        &self.env_vars
    }

    /// Resolves the API key from the process environment and keychain.
    pub async fn resolve(&self) -> Option<String> {
        self.resolve_with(|var| std::env::var(var).ok()).await
    }

    /// Resolves the API key using `lookup` for environment variables.
    pub async fn resolve_with<F>(&self, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = self.explicit.as_ref().filter(|k| !k.trim().is_empty()) {
            return Some(key.trim().to_string());
        }

        for var in &self.env_vars {
            if let Some(value) = lookup(var).map(|v| v.trim().to_string()) {
                if !value.is_empty() {
                    debug!(source = %var, "API key found in environment");
                    return Some(value);
                }
            }
        }

        let keychain = self.keychain.as_ref()?;
        match keychain.get(services::GEMINI, accounts::API_KEY).await {
            Ok(Some(key)) => {
                debug!("API key found in keychain");
                Some(key)
            }
            Ok(None) => {
                debug!("No API key configured");
                None
            }
            Err(e) => {
                warn!(error = %e, "Keychain unavailable, continuing without API key");
                None
            }
        }
    }
}

impl std::fmt::Debug for ApiKeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeySource")
            .field("explicit", &self.explicit.is_some())
            .field("env_vars", &self.env_vars)
            .field("keychain", &self.keychain.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nightcard_fetch::MemoryKeychain;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_env_order() {
        let source = ApiKeySource::new(Arc::new(MemoryKeychain::new()));
        let vars = env(&[("API_KEY", "second"), ("GEMINI_API_KEY", "third")]);

        let key = source.resolve_with(|v| vars.get(v).cloned()).await;
        assert_eq!(key.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_blank_env_is_skipped() {
        let source = ApiKeySource::new(Arc::new(MemoryKeychain::new()));
        let vars = env(&[("NIGHTCARD_API_KEY", "  "), ("GEMINI_API_KEY", "k")]);

        let key = source.resolve_with(|v| vars.get(v).cloned()).await;
        assert_eq!(key.as_deref(), Some("k"));
    }

    #[tokio::test]
    async fn test_keychain_fallback() {
        let keychain = MemoryKeychain::with_entry(services::GEMINI, accounts::API_KEY, "from-keychain");
        let source = ApiKeySource::new(Arc::new(keychain));

        let key = source.resolve_with(|_| None).await;
        assert_eq!(key.as_deref(), Some("from-keychain"));
    }

    #[tokio::test]
    async fn test_explicit_key_wins() {
        let source = ApiKeySource::explicit("direct");
        assert_eq!(source.resolve_with(|_| Some("env".to_string())).await.as_deref(), Some("direct"));
    }

    #[tokio::test]
    async fn test_nothing_configured() {
        let source = ApiKeySource::new(Arc::new(MemoryKeychain::new()));
        assert_eq!(source.resolve_with(|_| None).await, None);

        let env_only = ApiKeySource::env_only(vec!["X".to_string()]);
        assert_eq!(env_only.resolve_with(|_| None).await, None);
    }

    #[test]
    fn test_preferred_env_goes_first() {
        let source = ApiKeySource::env_only(vec!["A".to_string(), "B".to_string()])
            .with_preferred_env("B");
        assert_eq!(source.env_vars(), ["B".to_string(), "A".to_string()]);
    }
}
