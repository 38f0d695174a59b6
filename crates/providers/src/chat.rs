use crate::api::{ApiClient, RequestOptions};
use crate::error::ApiError;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use shared::chat::{parse_timestamp, ChatRequest, HealthStatus, RemoteMessage};
use shared::{ChatReply, Message, ReplyId};

/// Anything that can turn one user message into one assistant reply
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send_message(&self, message: &str) -> Result<ChatReply, ApiError>;

    /// Earlier messages of the current conversation, oldest first
    async fn history(&self) -> Result<Vec<Message>, ApiError> {
        Ok(Vec::new())
    }
}

/// Client for the `/api/chat` backend
pub struct ChatClient {
    api: ApiClient,
    conversation_id: String,
}

impl ChatClient {
    pub fn new(api: ApiClient, conversation_id: impl Into<String>) -> Self {
        Self {
            api,
            conversation_id: conversation_id.into(),
        }
    }

    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        let body = self.api.request("/health", RequestOptions::get()).await?;
        serde_json::from_value(body)
            .map_err(|e| ApiError::malformed(format!("health response: {e}")))
    }

    /// Full message log the backend keeps for `id`
    pub async fn conversation(&self, id: &str) -> Result<Vec<Message>, ApiError> {
        let body = self
            .api
            .request(&format!("/conversation/{id}"), RequestOptions::get())
            .await?;
        if !body.get("success").is_some_and(is_truthy) {
            return Err(ApiError::malformed("conversation request not successful"));
        }
        let messages = body
            .get("messages")
            .cloned()
            .ok_or_else(|| ApiError::malformed("messages missing"))?;
        let remote: Vec<RemoteMessage> = serde_json::from_value(messages)
            .map_err(|e| ApiError::malformed(format!("messages: {e}")))?;
        Ok(remote.into_iter().map(Message::from).collect())
    }
}

#[async_trait]
impl ChatBackend for ChatClient {
    async fn send_message(&self, message: &str) -> Result<ChatReply, ApiError> {
        let request = ChatRequest {
            message: message.to_string(),
            conversation_id: self.conversation_id.clone(),
        };
        let body = serde_json::to_value(&request)
            .map_err(|e| ApiError::malformed(format!("request encoding: {e}")))?;
        let reply = self.api.request("/chat", RequestOptions::post(body)).await?;
        parse_chat_response(&reply)
    }

    /// A conversation the backend has never seen is simply empty.
    async fn history(&self) -> Result<Vec<Message>, ApiError> {
        match self.conversation(&self.conversation_id).await {
            Err(ApiError::Status { status: 404, .. }) => Ok(Vec::new()),
            other => other,
        }
    }
}

/// Accept `{success: <truthy>, response: {id, content, timestamp}}`.
pub fn parse_chat_response(body: &Value) -> Result<ChatReply, ApiError> {
    if !body.get("success").is_some_and(is_truthy) {
        return Err(ApiError::malformed("success flag missing or false"));
    }
    let response = body
        .get("response")
        .filter(|v| v.is_object())
        .ok_or_else(|| ApiError::malformed("response object missing"))?;

    let id: ReplyId = response
        .get("id")
        .cloned()
        .ok_or_else(|| ApiError::malformed("response id missing"))
        .and_then(|v| {
            serde_json::from_value(v).map_err(|e| ApiError::malformed(format!("response id: {e}")))
        })?;

    let content = response
        .get("content")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::malformed("response content missing"))?
        .to_string();

    let timestamp = match response.get("timestamp").and_then(Value::as_str) {
        Some(raw) => parse_timestamp(raw).unwrap_or_else(|| {
            tracing::warn!("unparseable reply timestamp {:?}, using receive time", raw);
            Utc::now()
        }),
        None => Utc::now(),
    };

    Ok(ChatReply {
        id,
        content,
        timestamp,
    })
}

/// JavaScript truthiness, which is what the backend contract was written against
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
