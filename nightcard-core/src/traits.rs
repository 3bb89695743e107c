//! Trait definitions for `NightCard`.

use async_trait::async_trait;

use crate::models::ComfortRequest;

/// Something that can produce a short comforting message.
///
/// Implementations make at most one attempt per call and never fail: when
/// generation is impossible or goes wrong they return a fixed fallback
/// message instead. Callers therefore cannot tell a generated message from
/// a fallback one.
#[async_trait]
pub trait ComfortProvider: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Produces a comfort message for the given request.
    async fn fetch_message(&self, request: &ComfortRequest) -> String;
}
