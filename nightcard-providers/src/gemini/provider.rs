//! Gemini-backed comfort provider.

use async_trait::async_trait;
use nightcard_core::{ComfortProvider, ComfortRequest};
use nightcard_fetch::FetchContext;
use tracing::{debug, info, instrument, warn};

use super::api::{GEMINI_API_BASE, GeminiApiClient, GenerateContentRequest};
use super::credentials::ApiKeySource;
use super::error::GeminiError;
use crate::fallback::{FallbackReason, fallback_message};
use crate::prompt::{GenerationParams, build_instruction};

/// Default model.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Gemini provider configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct GeminiConfig {
    /// API base URL.
    pub api_base: String,
    /// Model name.
    pub model: String,
    /// Sampling parameters and length bound.
    pub params: GenerationParams,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_base: GEMINI_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            params: GenerationParams::default(),
        }
    }
}

/// What a single attempt produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComfortOutcome {
    /// Text produced by the model.
    Generated(String),
    /// A fixed message was used instead.
    Fallback(FallbackReason),
}

impl ComfortOutcome {
    /// The text to show, whichever way it was obtained.
    pub fn into_text(self) -> String {
        match self {
            ComfortOutcome::Generated(text) => text,
            ComfortOutcome::Fallback(reason) => fallback_message(reason).to_string(),
        }
    }

    /// Returns true for a fallback outcome.
    pub fn is_fallback(&self) -> bool {
        matches!(self, ComfortOutcome::Fallback(_))
    }
}

/// Comfort provider backed by Gemini `generateContent`.
#[derive(Debug, Clone)]
pub struct GeminiComfortProvider {
    api: GeminiApiClient,
    credentials: ApiKeySource,
    config: GeminiConfig,
}

impl GeminiComfortProvider {
    /// Creates a provider using the context's HTTP client and keychain.
    pub fn new(config: GeminiConfig, ctx: &FetchContext) -> Self {
        Self::with_credentials(config, ctx, ApiKeySource::new(ctx.keychain.clone()))
    }

    /// Creates a provider with an explicit credential source.
    pub fn with_credentials(config: GeminiConfig, ctx: &FetchContext, credentials: ApiKeySource) -> Self {
        Self {
            api: GeminiApiClient::new(ctx.http.clone(), config.api_base.clone()),
            credentials,
            config,
        }
    }

    /// The provider configuration.
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Makes one attempt and reports how the message was obtained.
    #[instrument(skip(self, request), fields(model = %self.config.model))]
    pub async fn generate(&self, request: &ComfortRequest) -> ComfortOutcome {
        let Some(api_key) = self.credentials.resolve().await else {
            debug!("No API key, using fallback message");
            return ComfortOutcome::Fallback(FallbackReason::NoCredentials);
        };

        match self.request_text(&api_key, request).await {
            Ok(text) if !text.trim().is_empty() => {
                info!(chars = text.chars().count(), "Comfort message generated");
                ComfortOutcome::Generated(text.trim().to_string())
            }
            Ok(_) => {
                warn!("Gemini returned no text, using fallback message");
                ComfortOutcome::Fallback(FallbackReason::EmptyResponse)
            }
            Err(e) => {
                warn!(error = %e, "Gemini request failed, using fallback message");
                ComfortOutcome::Fallback(FallbackReason::RequestFailed)
            }
        }
    }

    async fn request_text(&self, api_key: &str, request: &ComfortRequest) -> Result<String, GeminiError> {
        let instruction = build_instruction(request, self.config.params.max_message_chars);
        let body = GenerateContentRequest::single_turn(instruction, &self.config.params);
        let response = self
            .api
            .generate_content(api_key, &self.config.model, &body)
            .await?;
        Ok(response.text())
    }
}

#[async_trait]
impl ComfortProvider for GeminiComfortProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn fetch_message(&self, request: &ComfortRequest) -> String {
        self.generate(request).await.into_text()
    }
}
