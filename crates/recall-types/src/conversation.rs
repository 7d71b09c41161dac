//! Persisted conversation types.
//!
//! A conversation row is created by an explicit save and is never mutated
//! afterwards. Its `content` column holds the JSON-serialized transcript.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::llm::Message;

/// A saved conversation as read back from storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub id: i64,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub summary: String,
    pub model: String,
}

/// One entry of the "recent conversations" browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationListing {
    pub summary: String,
    pub id: i64,
}
