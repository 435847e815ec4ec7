//! Chat message types

use crate::error::{ChatError, ChatResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System message (persona and behaviour instructions)
    System,
    /// User message (human input)
    User,
    /// Assistant message (model reply)
    Assistant,
}

impl MessageRole {
    /// Wire name of the role, as sent to the completion API
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }

    /// Parse a wire role name
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "system" => Some(MessageRole::System),
            "user" => Some(MessageRole::User),
            "assistant" => Some(MessageRole::Assistant),
            _ => None,
        }
    }
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single role-tagged message in a conversation
///
/// Messages are immutable once created; a conversation only ever grows by
/// appending new ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender
    pub role: MessageRole,
    /// Text content of the message
    pub content: String,
}

impl ChatMessage {
    /// Create a message with an explicit role
    pub fn new<S: Into<String>>(role: MessageRole, content: S) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a new system message
    pub fn system<S: Into<String>>(content: S) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Create a new user message
    pub fn user<S: Into<String>>(content: S) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Create a new assistant message
    pub fn assistant<S: Into<String>>(content: S) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    pub fn is_system(&self) -> bool {
        self.role == MessageRole::System
    }

    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }

    pub fn is_assistant(&self) -> bool {
        self.role == MessageRole::Assistant
    }

    /// Build a message from an untyped JSON object
    ///
    /// `index` is the position of the message in its conversation and is
    /// only used for error reporting. Missing or non-string `role`/`content`
    /// fields and unknown roles are rejected rather than coerced.
    pub fn from_value(index: usize, value: &Value) -> ChatResult<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| ChatError::malformed(index, "expected a JSON object"))?;

        let role = match object.get("role") {
            None | Some(Value::Null) => {
                return Err(ChatError::malformed(index, "missing field `role`"));
            }
            Some(Value::String(name)) => MessageRole::parse(name).ok_or_else(|| {
                ChatError::malformed(index, format!("unknown role `{}`", name))
            })?,
            Some(_) => return Err(ChatError::malformed(index, "field `role` must be a string")),
        };

        let content = match object.get("content") {
            None | Some(Value::Null) => {
                return Err(ChatError::malformed(index, "missing field `content`"));
            }
            Some(Value::String(text)) => text.clone(),
            Some(_) => {
                return Err(ChatError::malformed(index, "field `content` must be a string"));
            }
        };

        Ok(Self { role, content })
    }
}

/// Parse a list of untyped JSON messages, failing on the first malformed one
pub fn parse_conversation(values: &[Value]) -> ChatResult<Vec<ChatMessage>> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| ChatMessage::from_value(index, value))
        .collect()
}

/// Parse a JSON document holding an array of messages
pub fn parse_conversation_json(json: &str) -> ChatResult<Vec<ChatMessage>> {
    let document: Value = serde_json::from_str(json)?;
    match document {
        Value::Array(values) => parse_conversation(&values),
        _ => Err(ChatError::invalid_input(
            "conversation document must be a JSON array of messages",
        )),
    }
}
