//! Gemini (Google) comfort provider.
//!
//! ## Credentials
//!
//! The API key is looked up in this order:
//!
//! 1. `NIGHTCARD_API_KEY`, `API_KEY`, `GEMINI_API_KEY` environment variables
//! 2. System keychain entry `nightcard:gemini` / `api_key`
//!
//! ## API Endpoints
//!
//! - `POST /v1beta/models/{model}:generateContent` - one request per spent card
//!
//! ## Failure Handling
//!
//! No key, a failed request, or an empty answer all end in a fixed fallback
//! message (see [`crate::fallback`]). Nothing is retried.

// Modules
mod api;
mod credentials;
mod error;
mod provider;

// Re-exports
pub use api::{
    GEMINI_API_BASE, GeminiApiClient, GenerateContentRequest, GenerateContentResponse,
};
pub use credentials::{ApiKeySource, DEFAULT_API_KEY_ENV_VARS};
pub use error::GeminiError;
pub use provider::{ComfortOutcome, DEFAULT_MODEL, GeminiComfortProvider, GeminiConfig};
