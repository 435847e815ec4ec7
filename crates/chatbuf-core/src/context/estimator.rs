//! Token estimation for chat messages
//!
//! Exact tokenization varies by model, so the buffer works with a
//! character-based approximation: one token per four characters, with a
//! fixed per-message overhead for role and formatting. Swapping this for a
//! real tokenizer changes which messages get selected and is a behavioural
//! change, not a precision fix.

use crate::llm::ChatMessage;
use serde::{Deserialize, Serialize};

/// Default characters per token
pub const DEFAULT_CHARS_PER_TOKEN: usize = 4;

/// Default per-message formatting overhead, in characters
pub const DEFAULT_MESSAGE_OVERHEAD_CHARS: usize = 20;

/// Token estimator for chat messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenEstimator {
    /// Characters per token (average)
    pub chars_per_token: usize,
    /// Overhead characters added to every message (role tag, separators)
    pub message_overhead_chars: usize,
}

impl Default for TokenEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenEstimator {
    /// Create a new token estimator with default settings
    pub fn new() -> Self {
        Self {
            chars_per_token: DEFAULT_CHARS_PER_TOKEN,
            message_overhead_chars: DEFAULT_MESSAGE_OVERHEAD_CHARS,
        }
    }

    pub fn with_chars_per_token(mut self, chars_per_token: usize) -> Self {
        self.chars_per_token = chars_per_token;
        self
    }

    pub fn with_message_overhead(mut self, overhead_chars: usize) -> Self {
        self.message_overhead_chars = overhead_chars;
        self
    }

    /// Estimate tokens for a single message
    ///
    /// `(chars(role) + chars(content) + overhead) / chars_per_token`, rounded down.
    pub fn estimate_message(&self, message: &ChatMessage) -> usize {
        let chars = message.role.as_str().chars().count()
            + message.content.chars().count()
            + self.message_overhead_chars;
        chars / self.chars_per_token.max(1)
    }

    /// Estimate tokens for a conversation (list of messages)
    pub fn estimate_conversation(&self, messages: &[ChatMessage]) -> usize {
        messages.iter().map(|m| self.estimate_message(m)).sum()
    }

    /// Estimate tokens for a bare string, without message overhead
    pub fn estimate_string(&self, text: &str) -> usize {
        text.chars().count() / self.chars_per_token.max(1)
    }
}
