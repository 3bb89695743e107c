//! Gemini API client.
//!
//! Wraps the single endpoint NightCard needs:
//! `POST /v1beta/models/{model}:generateContent`.

use std::sync::Arc;

use nightcard_fetch::{HttpClient, ResponseExt};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::error::GeminiError;
use crate::prompt::GenerationParams;

// ============================================================================
// Constants
// ============================================================================

/// Gemini API base URL (Generative Language API).
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

// ============================================================================
// Request Types
// ============================================================================

/// Body of a `generateContent` request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation turns; NightCard sends exactly one.
    pub contents: Vec<Content>,
    /// Sampling configuration.
    pub generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    /// Builds a single-turn request.
    pub fn single_turn(text: impl Into<String>, params: &GenerationParams) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(text.into()),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: params.temperature,
                top_p: params.top_p,
            },
        }
    }
}

/// Sampling configuration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus-sampling threshold.
    pub top_p: f32,
}

/// One conversation turn.
#[derive(Debug, Serialize, Deserialize)]
pub struct Content {
    /// "user" or "model".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Content parts.
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A content part. Only text parts matter here.
#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
    /// Text of the part.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

// ============================================================================
// Response Types
// ============================================================================

/// Body of a `generateContent` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Generated candidates.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Feedback on the prompt (set when it was blocked).
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

/// A generated candidate.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content.
    #[serde(default)]
    pub content: Option<Content>,
    /// Why generation stopped.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Prompt feedback.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Block reason, if the prompt was rejected.
    #[serde(default)]
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, or empty.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    /// Block reason, if the prompt was rejected.
    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
    }
}

// ============================================================================
// API Client
// ============================================================================

/// Gemini API client.
#[derive(Debug, Clone)]
pub struct GeminiApiClient {
    http: Arc<HttpClient>,
    base_url: String,
}

impl GeminiApiClient {
    /// Creates a client against `base_url` (no trailing slash needed).
    pub fn new(http: Arc<HttpClient>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    /// Builds the endpoint URL for a model.
    fn endpoint(&self, model: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!("{}/v1beta/models/{model}:generateContent", self.base_url)
    }

    /// Build request headers.
    fn build_headers(api_key: &str) -> Result<HeaderMap, GeminiError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            API_KEY_HEADER,
            HeaderValue::from_str(api_key)
                .map_err(|e| GeminiError::HttpError(format!("Invalid API key: {e}")))?,
        );
        Ok(headers)
    }

    /// Generates text for a single-turn prompt. One attempt, no retries.
    #[instrument(skip(self, api_key, request))]
    pub async fn generate_content(
        &self,
        api_key: &str,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        debug!("Requesting Gemini content");

        let url = self.endpoint(model);
        let headers = Self::build_headers(api_key)?;

        let response = self.http.post_json_with_headers(&url, headers, request).await?;

        if response.is_auth_failure() {
            return Err(GeminiError::AuthenticationFailed("API key rejected".to_string()));
        }

        if response.is_rate_limited() {
            return Err(GeminiError::RateLimited("Too many requests".to_string()));
        }

        let status = response.status();
        if !status.is_success() {
            return Err(GeminiError::InvalidResponse(format!("HTTP {status}")));
        }

        let body = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, "Failed to parse generateContent response");
            GeminiError::InvalidResponse(format!("JSON error: {e}"))
        })?;

        if let Some(reason) = parsed.block_reason() {
            return Err(GeminiError::Blocked(reason.to_string()));
        }

        debug!(candidates = parsed.candidates.len(), "Gemini content received");
        Ok(parsed)
    }
}

// ============================================================================
// Tests
// ============================================================================
