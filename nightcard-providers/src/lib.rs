// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # NightCard Providers
//!
//! Comfort message providers for the NightCard application.
//!
//! Every provider implements [`nightcard_core::ComfortProvider`] and never
//! fails: when a message cannot be generated it answers with one of the
//! fixed strings in [`fallback`].
//!
//! | Provider | Source | Network |
//! |----------|--------|---------|
//! | [`GeminiComfortProvider`] | Gemini `generateContent` | one request per card |
//! | [`StaticComfortProvider`] | fixed text | none |
//!
//! ## Usage
//!
//! ```ignore
//! use nightcard_core::{ComfortProvider, ComfortRequest};
//! use nightcard_fetch::FetchContext;
//! use nightcard_providers::{GeminiComfortProvider, GeminiConfig};
//!
//! let ctx = FetchContext::builder().build()?;
//! let provider = GeminiComfortProvider::new(GeminiConfig::default(), &ctx);
//! let message = provider.fetch_message(&ComfortRequest::default()).await;
//! ```

pub mod fallback;
pub mod gemini;
pub mod prompt;
pub mod static_provider;

// Re-export key types
pub use fallback::{FallbackReason, fallback_message, is_fallback};
pub use gemini::{ApiKeySource, ComfortOutcome, GeminiComfortProvider, GeminiConfig, GeminiError};
pub use prompt::{GenerationParams, build_instruction};
pub use static_provider::StaticComfortProvider;
