//! Comfort request type.

use serde::{Deserialize, Serialize};

/// Emotion used when the caller does not name one ("anger").
pub const DEFAULT_EMOTION: &str = "生气";

/// Context handed to a comfort provider when a card is spent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComfortRequest {
    /// The feeling being archived for the night.
    pub emotion: String,
}

impl ComfortRequest {
    /// Creates a request for the given emotion.
    ///
    /// Blank input falls back to [`DEFAULT_EMOTION`].
    pub fn new(emotion: impl Into<String>) -> Self {
        let emotion = emotion.into();
        let emotion = emotion.trim();
        Self {
            emotion: if emotion.is_empty() {
                DEFAULT_EMOTION.to_string()
            } else {
                emotion.to_string()
            },
        }
    }
}

impl Default for ComfortRequest {
    fn default() -> Self {
        Self::new(DEFAULT_EMOTION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_request_uses_default_emotion() {
        assert_eq!(ComfortRequest::default().emotion, DEFAULT_EMOTION);
    }

    #[test]
    fn test_blank_emotion_falls_back() {
        assert_eq!(ComfortRequest::new("  ").emotion, DEFAULT_EMOTION);
        assert_eq!(ComfortRequest::new(" 委屈 ").emotion, "委屈");
    }
}
