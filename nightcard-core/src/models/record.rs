//! Usage record type.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// One spent archive card.
///
/// Records are created once, when a card is spent, and never change
/// afterwards. They only disappear when the whole session is reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    /// Opaque unique identifier (UUID v4).
    pub id: String,
    /// When the card was spent, at millisecond precision.
    #[serde(serialize_with = "serialize_millis", deserialize_with = "deserialize_millis")]
    pub timestamp: DateTime<Utc>,
    /// The message shown when the card was spent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comfort_message: Option<String>,
}

impl UsageRecord {
    /// Creates a record stamped with the current time and a fresh id.
    ///
    /// An empty or whitespace-only message is stored as absent.
    pub fn new(message: impl Into<String>) -> Self {
        Self::at(Utc::now(), message)
    }

    /// Creates a record with an explicit timestamp.
    ///
    /// The timestamp is truncated to milliseconds, the precision it is stored with.
    pub fn at(timestamp: DateTime<Utc>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: timestamp.trunc_subsecs(3),
            comfort_message: if message.trim().is_empty() {
                None
            } else {
                Some(message)
            },
        }
    }

    /// Returns the message, or an empty string when none was recorded.
    pub fn message(&self) -> &str {
        self.comfort_message.as_deref().unwrap_or_default()
    }
}

/// Serializes as `2024-01-02T03:04:05.678Z`.
fn serialize_millis<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn deserialize_millis<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(DateTime::<Utc>::deserialize(deserializer)?.trunc_subsecs(3))
}
