// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `NightCard` Core
//!
//! Core types, models, and traits for the `NightCard` application.
//!
//! This crate provides the foundational abstractions used across all other
//! `NightCard` crates, including:
//!
//! - Domain models (archive cards, usage records, session state)
//! - Error types
//! - The trait implemented by comfort message providers
//!
//! ## Key Types
//!
//! - [`SessionState`] - Remaining cards plus usage history, persisted as one unit
//! - [`UsageRecord`] - One spent card with its comfort message
//! - [`ComfortRequest`] - Context passed to a comfort message provider
//! - [`ComfortProvider`] - Trait for anything that can produce a comfort message

pub mod error;
pub mod models;
pub mod traits;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    ComfortRequest, DEFAULT_EMOTION, MAX_CARDS, STORAGE_KEY, SessionState, UsageRecord,
};

// Re-export traits
pub use traits::ComfortProvider;
