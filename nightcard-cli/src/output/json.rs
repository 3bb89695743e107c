//! JSON output formatting.

use anyhow::Result;
use nightcard_core::UsageRecord;
use nightcard_store::{ResetOutcome, SpendOutcome};
use serde::Serialize;

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for `use`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendOutput<'a> {
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<&'a UsageRecord>,
    pub remaining_cards: u32,
}

impl<'a> SpendOutput<'a> {
    /// Builds the output for a spend outcome.
    pub fn new(outcome: &'a SpendOutcome, remaining_cards: u32) -> Self {
        let label = match outcome {
            SpendOutcome::Spent(_) => "spent",
            SpendOutcome::Exhausted => "exhausted",
            SpendOutcome::Busy => "busy",
        };
        Self {
            outcome: label,
            record: outcome.record(),
            remaining_cards,
        }
    }
}

/// JSON output for `reset`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetOutput {
    pub outcome: &'static str,
    pub remaining_cards: u32,
}

impl ResetOutput {
    /// Builds the output for a reset outcome.
    pub fn new(outcome: ResetOutcome, remaining_cards: u32) -> Self {
        let label = match outcome {
            ResetOutcome::Reset => "reset",
            ResetOutcome::Declined => "declined",
            ResetOutcome::Busy => "busy",
        };
        Self {
            outcome: label,
            remaining_cards,
        }
    }
}

// ============================================================================
// Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }
}
