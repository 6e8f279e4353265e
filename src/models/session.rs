use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Unknown,
}

impl Role {
    /// Map a bubble `type` code (numeric or textual) to a role
    pub fn from_type_code(code: Option<&Value>) -> Self {
        match code {
            Some(Value::Number(n)) => match n.as_i64() {
                Some(1) => Role::User,
                Some(2) => Role::Assistant,
                _ => Role::Unknown,
            },
            Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "1" | "user" | "human" => Role::User,
                "2" | "assistant" | "ai" | "bot" => Role::Assistant,
                _ => Role::Unknown,
            },
            _ => Role::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: Option<DateTime<Utc>>,
}

/// A conversation rebuilt from its fragments, messages in ascending time order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub session_id: String,
    pub messages: Vec<Message>,
    /// Timestamp of the first message that carries one; `None` when no message does
    pub timestamp: Option<DateTime<Utc>>,
}

impl Session {
    /// All message contents joined by single spaces
    pub fn text(&self) -> String {
        let total_len: usize = self.messages.iter().map(|m| m.content.len() + 1).sum();
        let mut text = String::with_capacity(total_len);
        for (i, message) in self.messages.iter().enumerate() {
            if i > 0 {
                text.push(' ');
            }
            text.push_str(&message.content);
        }
        text
    }
}
