//! Domain models for `NightCard`.
//!
//! ## Submodules
//!
//! - [`record`] - A single spent card ([`UsageRecord`])
//! - [`session`] - The persisted session ([`SessionState`])
//! - [`request`] - Provider input ([`ComfortRequest`])

mod record;
mod request;
mod session;

pub use record::UsageRecord;
pub use request::{ComfortRequest, DEFAULT_EMOTION};
pub use session::{MAX_CARDS, STORAGE_KEY, SessionState};
