use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::session::Role;

/// A single row from a key/value table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub key: String,
    pub value: String,
}

impl RawRecord {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { key: key.into(), value: value.into() }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BubblePayload {
    #[serde(rename = "type", default)]
    pub type_code: Option<Value>,
    #[serde(
        default,
        deserialize_with = "crate::parsers::deserializers::deserialize_lenient_string"
    )]
    pub text: Option<String>,
    #[serde(
        rename = "richText",
        default,
        deserialize_with = "crate::parsers::deserializers::deserialize_lenient_string"
    )]
    pub rich_text: Option<String>,
    #[serde(
        rename = "cTime",
        default,
        deserialize_with = "crate::parsers::deserializers::deserialize_optional_timestamp"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "crate::parsers::deserializers::deserialize_optional_timestamp"
    )]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(
        rename = "conversationId",
        default,
        deserialize_with = "crate::parsers::deserializers::deserialize_lenient_string"
    )]
    pub conversation_id: Option<String>,
}

impl BubblePayload {
    /// `cTime` when present, otherwise `timestamp`
    pub fn effective_timestamp(&self) -> Option<DateTime<Utc>> {
        self.created_at.or(self.timestamp)
    }

    /// Primary text; for assistant bubbles, replaced by the rich text when that is strictly
    /// longer
    ///
    /// A user bubble's `richText` is the serialized editor state, not message text.
    pub fn best_content(&self, role: Role) -> &str {
        let primary = self.text.as_deref().unwrap_or("");
        if role != Role::Assistant {
            return primary;
        }
        match self.rich_text.as_deref() {
            Some(rich) if rich.chars().count() > primary.chars().count() => rich,
            _ => primary,
        }
    }
}

/// A validated bubble with its identifiers taken from the row key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageFragment {
    pub conversation_id: String,
    pub bubble_id: String,
    pub role: Role,
    /// Trimmed content; may be empty, in which case it never becomes a message
    pub content: String,
    pub timestamp: Option<DateTime<Utc>>,
}

impl MessageFragment {
    /// Ordering key within a conversation; missing timestamps count as the epoch
    pub fn sort_key(&self) -> DateTime<Utc> {
        self.timestamp.unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }
}
