//! Chat transcript entries.
//!
//! A `Message` is immutable once created: the store only ever appends new
//! messages or clears the whole transcript.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Number of random base-36 characters appended to every message id.
const ID_SUFFIX_LEN: usize = 9;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "Assistant",
        }
    }
}

/// One turn in the chat transcript.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    /// ISO-8601 creation time (UTC, millisecond precision).
    pub timestamp: String,
    /// Follow-up question extracted from a canned reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Message {
    /// Create a message with a fresh id and the current time.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: generate_message_id(),
            role,
            content: content.into(),
            timestamp: now_timestamp(),
            suggestion: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn with_suggestion(mut self, suggestion: Option<String>) -> Self {
        self.suggestion = suggestion;
        self
    }
}

/// Generate an id of the form `msg_<unix millis>_<9 base-36 chars>`.
///
/// Uniqueness is best-effort only.
pub fn generate_message_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let mut bits: u64 = rand::random();
    let mut suffix = String::with_capacity(ID_SUFFIX_LEN);
    for _ in 0..ID_SUFFIX_LEN {
        suffix.push(BASE36[(bits % 36) as usize] as char);
        bits /= 36;
    }
    format!("msg_{}_{}", millis, suffix)
}

/// Current time as an ISO-8601 string, e.g. `2024-05-01T12:00:00.000Z`.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
