use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::project::ProjectDescriptor;
use super::session::Message;

/// One exported conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRecord {
    pub session_id: String,
    pub project: ProjectDescriptor,
    pub messages: Vec<Message>,
    pub timestamp: Option<DateTime<Utc>>,
}
