//! Conversation messages and the JSON shapes exchanged with the chat backend.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    /// The backend spells this `ai`
    #[serde(rename = "ai", alias = "assistant")]
    Assistant,
}

/// Identifier of a message in the thread
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageId {
    /// Time-based id minted on this machine (milliseconds since epoch)
    Local(i64),
    /// Id assigned by the backend
    Server(ReplyId),
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageId::Local(ms) => write!(f, "local-{ms}"),
            MessageId::Server(id) => id.fmt(f),
        }
    }
}

/// The backend sends ids as either strings or numbers, and any JSON number
/// counts (floats and values past `i64` included)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReplyId {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for ReplyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplyId::Number(n) => write!(f, "{n}"),
            ReplyId::Text(s) => f.write_str(s),
        }
    }
}

/// One entry in the conversation thread. Never mutated once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn local(id: i64, role: Role, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::Local(id),
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    /// Short clock time for the thread view
    pub fn formatted_time(&self) -> String {
        self.created_at.format("%H:%M").to_string()
    }
}

impl From<ChatReply> for Message {
    fn from(reply: ChatReply) -> Self {
        Self {
            id: MessageId::Server(reply.id),
            role: Role::Assistant,
            content: reply.content,
            created_at: reply.timestamp,
        }
    }
}

/// Body of `POST /api/chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub conversation_id: String,
}

/// The assistant reply carried in a successful chat response
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub id: ReplyId,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Body of `GET /api/health`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// A message as stored by the backend's conversation log
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteMessage {
    pub id: ReplyId,
    #[serde(rename = "type")]
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl From<RemoteMessage> for Message {
    fn from(remote: RemoteMessage) -> Self {
        let created_at = remote
            .timestamp
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or_else(Utc::now);
        Self {
            id: MessageId::Server(remote.id),
            role: remote.role,
            content: remote.content,
            created_at,
        }
    }
}

/// Parse an ISO-8601 timestamp. Accepts RFC 3339 with an offset, or a naive
/// date-time (which the backend emits) read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
