//! Transcript message types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Speaker of a message. `System` never appears in a stored transcript —
/// it exists only in outbound request composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// One turn in a conversation. Immutable once appended to the transcript.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    /// Unique per message, never reused.
    pub id: Uuid,
    pub role: Role,
    /// Non-empty for stored messages (enforced by the session's input check).
    pub content: String,
    /// Display ordering/labeling only — never consulted by session logic.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}
