//! Provider that always answers with the same text.

use async_trait::async_trait;
use nightcard_core::{ComfortProvider, ComfortRequest};
use tracing::debug;

use crate::fallback::{FallbackReason, fallback_message};

/// Offline provider returning a fixed message.
#[derive(Debug, Clone)]
pub struct StaticComfortProvider {
    message: String,
}

impl StaticComfortProvider {
    /// Creates a provider answering with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Creates a provider answering with the no-credentials fallback.
    pub fn offline() -> Self {
        Self::new(fallback_message(FallbackReason::NoCredentials))
    }
}

#[async_trait]
impl ComfortProvider for StaticComfortProvider {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch_message(&self, request: &ComfortRequest) -> String {
        debug!(emotion = %request.emotion, "Answering with static message");
        self.message.clone()
    }
}
