//! Conversation store

use crate::context::split_directive;
use crate::llm::ChatMessage;
use serde::{Deserialize, Serialize};

/// Append-only, in-memory conversation history
///
/// The only ways to change it are appending a message and clearing the
/// dialogue; the directive survives clearing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a conversation with a system directive
    pub fn with_directive(directive: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::system(directive)],
        }
    }

    /// Wrap existing history, e.g. one parsed from JSON
    pub fn from_messages(messages: Vec<ChatMessage>) -> Self {
        Self { messages }
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// The leading system message, if any
    pub fn directive(&self) -> Option<&ChatMessage> {
        split_directive(&self.messages).0
    }

    /// Everything after the directive
    pub fn body(&self) -> &[ChatMessage] {
        split_directive(&self.messages).1
    }

    /// Most recent assistant reply
    pub fn last_assistant(&self) -> Option<&ChatMessage> {
        self.messages.iter().rev().find(|m| m.is_assistant())
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Drop the dialogue but keep the directive
    pub fn clear_dialogue(&mut self) {
        let keep = usize::from(self.directive().is_some());
        self.messages.truncate(keep);
    }
}

impl From<Vec<ChatMessage>> for Conversation {
    fn from(messages: Vec<ChatMessage>) -> Self {
        Self::from_messages(messages)
    }
}
