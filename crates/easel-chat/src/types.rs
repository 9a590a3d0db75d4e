use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One turn of a conversation, relayed verbatim
///
/// Only `role` and `content` are ever read; every other field (content parts,
/// `refusal`, `tool_calls`, `annotations`) travels through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ChatMessage(Map<String, Value>);

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("role".to_owned(), Value::String("user".to_owned()));
        fields.insert("content".to_owned(), Value::String(content.into()));
        Self(fields)
    }

    pub fn role(&self) -> Option<&str> {
        self.0.get("role").and_then(Value::as_str)
    }

    /// A string, an array of content parts, or `null` for tool-call turns
    pub fn content(&self) -> Option<&Value> {
        self.0.get("content")
    }
}

/// Incoming `/api/chat` body
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Option<Vec<ChatMessage>>,
}

impl ChatRequest {
    /// Caller's messages, or a lone greeting when none were sent
    pub fn into_messages(self) -> Vec<ChatMessage> {
        self.messages.unwrap_or_else(|| vec![ChatMessage::user("Hello!")])
    }
}

/// Successful `/api/chat` body
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChatResponse {
    pub ok: bool,
    pub message: ChatMessage,
}
