// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `NightCard` Store
//!
//! State management and persistence for the `NightCard` application.
//!
//! This crate provides:
//!
//! - **SessionManager**: The live session with its spend and reset transitions
//! - **SessionStore**: Loads and saves the session through a key-value backend
//! - **KeyValueStore**: File and in-memory backends
//! - **SettingsStore**: User preferences with persistence
//! - **Persistence**: File I/O helpers for JSON data
//!
//! ## Usage
//!
//! ```ignore
//! use nightcard_core::ComfortRequest;
//! use nightcard_store::{ResetApproval, SessionManager, SessionStore};
//!
//! let manager = SessionManager::load(SessionStore::open_default(), provider).await;
//!
//! // Subscribe to changes
//! let mut rx = manager.subscribe();
//!
//! manager.spend(&ComfortRequest::default()).await;
//! manager.reset(ResetApproval::Confirmed).await;
//! ```

pub mod error;
pub mod kv;
pub mod persistence;
pub mod session_manager;
pub mod session_store;
pub mod settings_store;

pub use error::StoreError;
pub use kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use persistence::{
    default_config_dir, default_data_dir, default_settings_path, load_json, load_json_or_default,
    save_json,
};
pub use session_manager::{ResetApproval, ResetOutcome, SessionManager, SpendOutcome};
pub use session_store::SessionStore;
pub use settings_store::{DEFAULT_SHARE_URL, LogLevel, Settings, SettingsStore};
