//! Fetch context providing access to host APIs.
//!
//! The fetch context is handed to providers and gives unified access to
//! the keychain and the HTTP client.

use std::sync::Arc;
use std::time::Duration;

use crate::error::HttpError;
use crate::host::{http::DEFAULT_TIMEOUT_SECS, http::HttpClient, keychain::KeychainApi, keychain::SystemKeychain};

// ============================================================================
// Fetch Settings
// ============================================================================

/// Settings for fetch operations.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Timeout for a single request. This is the only timeout applied.
    pub timeout: Duration,
    /// Domains requests may go to. Empty means unrestricted.
    pub allowed_domains: Vec<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            allowed_domains: Vec::new(),
        }
    }
}

impl FetchSettings {
    /// Creates settings with custom timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// ============================================================================
// Fetch Context
// ============================================================================

/// Context provided to providers, giving access to host APIs.
pub struct FetchContext {
    /// Secure credential storage.
    pub keychain: Arc<dyn KeychainApi>,
    /// HTTP client with tracing.
    pub http: Arc<HttpClient>,
    /// Fetch settings.
    pub settings: FetchSettings,
}

impl FetchContext {
    /// Creates a builder for customizing the context.
    pub fn builder() -> FetchContextBuilder {
        FetchContextBuilder::new()
    }

    /// Returns the effective request timeout.
    pub fn timeout(&self) -> Duration {
        self.settings.timeout
    }
}

impl std::fmt::Debug for FetchContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchContext")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Fetch Context Builder
// ============================================================================

/// Builder for constructing a `FetchContext`.
pub struct FetchContextBuilder {
    keychain: Option<Arc<dyn KeychainApi>>,
    http: Option<Arc<HttpClient>>,
    settings: FetchSettings,
}

impl FetchContextBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            keychain: None,
            http: None,
            settings: FetchSettings::default(),
        }
    }

    /// Sets the keychain implementation.
    #[must_use]
    pub fn keychain(mut self, keychain: Arc<dyn KeychainApi>) -> Self {
        self.keychain = Some(keychain);
        self
    }

    /// Sets the HTTP client. Timeout and allowlist settings are then ignored.
    #[must_use]
    pub fn http(mut self, http: Arc<HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    /// Sets the fetch settings.
    #[must_use]
    pub fn settings(mut self, settings: FetchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.settings.timeout = timeout;
        self
    }

    /// Adds a domain to the allowlist.
    #[must_use]
    pub fn allowed_domain(mut self, domain: impl Into<String>) -> Self {
        self.settings.allowed_domains.push(domain.into());
        self
    }

    /// Builds the fetch context.
    ///
    /// # Errors
    ///
    /// Returns `HttpError::Build` if a default HTTP client cannot be created.
    pub fn build(self) -> Result<FetchContext, HttpError> {
        let http = match self.http {
            Some(http) => http,
            None => {
                let mut client = HttpClient::with_timeout(self.settings.timeout)?;
                if !self.settings.allowed_domains.is_empty() {
                    client = client.with_allowed_domains(self.settings.allowed_domains.clone());
                }
                Arc::new(client)
            }
        };

        Ok(FetchContext {
            keychain: self.keychain.unwrap_or_else(|| Arc::new(SystemKeychain::new())),
            http,
            settings: self.settings,
        })
    }
}

impl Default for FetchContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::keychain::MemoryKeychain;

    #[test]
    fn test_context_builder() {
        let ctx = FetchContext::builder()
            .keychain(Arc::new(MemoryKeychain::new()))
            .timeout(Duration::from_secs(60))
            .allowed_domain("googleapis.com")
            .build()
            .unwrap();

        assert_eq!(ctx.timeout(), Duration::from_secs(60));
        assert_eq!(ctx.settings.allowed_domains, vec!["googleapis.com".to_string()]);
    }

    #[test]
    fn test_default_settings() {
        let settings = FetchSettings::default();
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert!(settings.allowed_domains.is_empty());
        assert_eq!(
            settings.with_timeout(Duration::from_secs(5)).timeout,
            Duration::from_secs(5)
        );
    }
}
