//! CLI command implementations.

pub mod card;
pub mod config;
pub mod history;
pub mod key;
pub mod reset;
pub mod session;
pub mod share;
pub mod use_card;
