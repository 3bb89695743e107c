//! Fixed messages used when a comfort message cannot be generated.

use std::fmt;

/// Used when no API key is configured.
pub const NO_CREDENTIALS: &str = "情绪已寄存。无论此刻如何，明天太阳照常升起。晚安。";

/// Used when the service answered but produced no text.
pub const EMPTY_RESPONSE: &str = "没关系的，先把这份情绪寄存。晚安，明天醒来会是新的一天。";

/// Used when the request failed for any reason.
pub const REQUEST_FAILED: &str = "情绪已安全存档。现在请深呼吸，让这一刻的重担暂时放下。";

/// Why a fallback message was used. Only ever logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FallbackReason {
    /// No API key found.
    NoCredentials,
    /// Empty text in an otherwise successful response.
    EmptyResponse,
    /// Transport, status, or parse failure.
    RequestFailed,
}

impl FallbackReason {
    /// All fallback reasons.
    pub fn all() -> &'static [FallbackReason] {
        &[
            FallbackReason::NoCredentials,
            FallbackReason::EmptyResponse,
            FallbackReason::RequestFailed,
        ]
    }
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::NoCredentials => write!(f, "no credentials"),
            FallbackReason::EmptyResponse => write!(f, "empty response"),
            FallbackReason::RequestFailed => write!(f, "request failed"),
        }
    }
}

/// Returns the fixed message for a fallback reason.
pub fn fallback_message(reason: FallbackReason) -> &'static str {
    match reason {
        FallbackReason::NoCredentials => NO_CREDENTIALS,
        FallbackReason::EmptyResponse => EMPTY_RESPONSE,
        FallbackReason::RequestFailed => REQUEST_FAILED,
    }
}

/// Returns true if `text` is one of the fixed fallback messages.
pub fn is_fallback(text: &str) -> bool {
    FallbackReason::all()
        .iter()
        .any(|reason| fallback_message(*reason) == text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_messages_are_distinct_and_short() {
        let messages: Vec<_> = FallbackReason::all()
            .iter()
            .map(|r| fallback_message(*r))
            .collect();

        for (i, a) in messages.iter().enumerate() {
            assert!(a.chars().count() <= 50, "too long: {a}");
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_is_fallback() {
        assert!(is_fallback(REQUEST_FAILED));
        assert!(is_fallback(NO_CREDENTIALS));
        assert!(!is_fallback("晚安"));
    }

    #[test]
    fn test_reason_display() {
        assert_eq!(FallbackReason::RequestFailed.to_string(), "request failed");
    }
}
