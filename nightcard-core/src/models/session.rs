//! Session state type.

use serde::{Deserialize, Serialize};

use super::record::UsageRecord;
use crate::error::CoreError;

/// Number of cards a fresh (or reset) session holds.
pub const MAX_CARDS: u32 = 3;

/// Fixed storage key the session is persisted under.
pub const STORAGE_KEY: &str = "stay_angry_state";

/// The whole persisted session: remaining cards plus usage history.
///
/// Serialized as `{"remainingCards": 3, "history": [...]}`. The only ways
/// to change a session are [`SessionState::apply_spend`] and replacing it
/// with [`SessionState::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    remaining_cards: u32,
    #[serde(default)]
    history: Vec<UsageRecord>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            remaining_cards: MAX_CARDS,
            history: Vec::new(),
        }
    }
}

impl SessionState {
    /// Builds a session from its parts.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidData` if `remaining_cards` exceeds [`MAX_CARDS`].
    pub fn from_parts(remaining_cards: u32, history: Vec<UsageRecord>) -> Result<Self, CoreError> {
        let state = Self {
            remaining_cards,
            history,
        };
        state.validate()?;
        Ok(state)
    }

    /// Cards left to spend.
    pub fn remaining_cards(&self) -> u32 {
        self.remaining_cards
    }

    /// Usage history, oldest first.
    pub fn history(&self) -> &[UsageRecord] {
        &self.history
    }

    /// Usage history, newest first (display order).
    pub fn history_newest_first(&self) -> impl Iterator<Item = &UsageRecord> {
        self.history.iter().rev()
    }

    /// The most recently spent card.
    pub fn latest(&self) -> Option<&UsageRecord> {
        self.history.last()
    }

    /// Returns true if at least one card is left.
    pub fn can_spend(&self) -> bool {
        self.remaining_cards > 0
    }

    /// Returns true if every card has been spent.
    pub fn is_exhausted(&self) -> bool {
        self.remaining_cards == 0
    }

    /// Spends one card and appends its record.
    ///
    /// Returns false, leaving the session untouched, when no card is left.
    pub fn apply_spend(&mut self, record: UsageRecord) -> bool {
        if !self.can_spend() {
            return false;
        }
        self.remaining_cards -= 1;
        self.history.push(record);
        true
    }

    /// Checks the session invariants.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidData` if more than [`MAX_CARDS`] cards remain.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.remaining_cards > MAX_CARDS {
            return Err(CoreError::InvalidData(format!(
                "remaining cards {} exceeds maximum of {MAX_CARDS}",
                self.remaining_cards
            )));
        }
        Ok(())
    }

    /// Clamps the card count into range, keeping the history.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.remaining_cards = self.remaining_cards.min(MAX_CARDS);
        self
    }

    /// Serializes to the compact persisted form.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Serialization` if serialization fails.
    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses the persisted form.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Serialization` for malformed JSON.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let state = SessionState::default();
        assert_eq!(state.remaining_cards(), MAX_CARDS);
        assert!(state.history().is_empty());
        assert!(state.can_spend());
        assert!(state.latest().is_none());
    }

    #[test]
    fn test_apply_spend_until_exhausted() {
        let mut state = SessionState::default();
        for i in 0..MAX_CARDS {
            assert!(state.apply_spend(UsageRecord::new(format!("msg {i}"))));
        }
        assert!(state.is_exhausted());
        assert_eq!(state.history().len(), 3);

        // A fourth spend changes nothing.
        let before = state.clone();
        assert!(!state.apply_spend(UsageRecord::new("extra")));
        assert_eq!(state, before);
    }

    #[test]
    fn test_history_order() {
        let mut state = SessionState::default();
        state.apply_spend(UsageRecord::new("first"));
        state.apply_spend(UsageRecord::new("second"));

        assert_eq!(state.history()[0].message(), "first");
        assert_eq!(state.latest().map(UsageRecord::message), Some("second"));

        let newest: Vec<_> = state.history_newest_first().map(UsageRecord::message).collect();
        assert_eq!(newest, vec!["second", "first"]);
    }

    #[test]
    fn test_from_parts_rejects_too_many_cards() {
        assert!(SessionState::from_parts(4, vec![]).is_err());
        assert!(SessionState::from_parts(0, vec![]).is_ok());
    }

    #[test]
    fn test_normalized_clamps() {
        let state = SessionState::from_json(r#"{"remainingCards": 9, "history": []}"#).unwrap();
        assert!(state.validate().is_err());
        assert_eq!(state.normalized().remaining_cards(), MAX_CARDS);
    }
}
