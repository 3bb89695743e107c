// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # NightCard Fetch
//!
//! Host APIs used by comfort message providers.
//!
//! ## Host APIs
//!
//! The [`host`] module provides abstractions for system interactions:
//!
//! - [`host::keychain`] - Secure credential storage (system keychain)
//! - [`host::http`] - HTTP client with tracing and domain allowlist
//!
//! ## Fetch Context
//!
//! [`context::FetchContext`] bundles the host APIs so providers can be
//! built against real or in-memory implementations.
//!
//! ## Example
//!
//! ```ignore
//! use nightcard_fetch::FetchContext;
//! use std::time::Duration;
//!
//! let ctx = FetchContext::builder()
//!     .timeout(Duration::from_secs(20))
//!     .allowed_domain("generativelanguage.googleapis.com")
//!     .build()?;
//!
//! let key = ctx.keychain.get("gemini", "api_key").await?;
//! ```

pub mod context;
pub mod error;
pub mod host;

// Errors
pub use error::{HttpError, KeychainError};

// Host APIs
pub use host::{
    http::{HttpClient, ResponseExt},
    keychain::{KeychainApi, MemoryKeychain, SystemKeychain},
};

// Context
pub use context::{FetchContext, FetchContextBuilder, FetchSettings};
