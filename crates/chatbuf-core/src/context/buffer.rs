//! Context buffer manager
//!
//! Derives the slice of a conversation that is forwarded to the model on
//! each turn. The output is always the optional leading system directive
//! followed by a contiguous, chronologically ordered suffix of the dialogue.

use crate::llm::ChatMessage;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::budget::Budget;
use super::estimator::TokenEstimator;

/// Select the messages to send for `conversation` under `budget`,
/// using the default token estimator
pub fn select(conversation: &[ChatMessage], budget: Budget) -> Vec<ChatMessage> {
    ContextBuffer::new(budget).select(conversation)
}

/// Split a conversation into its leading system directive (if any) and the
/// remaining dialogue
pub fn split_directive(conversation: &[ChatMessage]) -> (Option<&ChatMessage>, &[ChatMessage]) {
    match conversation.split_first() {
        Some((first, rest)) if first.is_system() => (Some(first), rest),
        _ => (None, conversation),
    }
}

/// Stateless context buffer bound to a budget and an estimator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContextBuffer {
    budget: Budget,
    estimator: TokenEstimator,
}

impl ContextBuffer {
    /// Create a buffer with the default estimator
    pub fn new(budget: Budget) -> Self {
        Self {
            budget,
            estimator: TokenEstimator::new(),
        }
    }

    /// Create with custom estimator
    pub fn with_estimator(budget: Budget, estimator: TokenEstimator) -> Self {
        Self { budget, estimator }
    }

    pub fn budget(&self) -> Budget {
        self.budget
    }

    pub fn estimator(&self) -> &TokenEstimator {
        &self.estimator
    }

    /// Messages to forward to the model
    ///
    /// Never reorders or invents messages, and always keeps the directive
    /// first when there is one.
    pub fn select(&self, conversation: &[ChatMessage]) -> Vec<ChatMessage> {
        let (directive, body) = split_directive(conversation);

        let start = match self.budget {
            budget if budget.is_zero() => body.len(),
            Budget::Exchanges { exchanges } => recent_exchanges_start(body, exchanges),
            Budget::Tokens { max_tokens } => {
                let directive_cost = directive
                    .map(|d| self.estimator.estimate_message(d))
                    .unwrap_or(0);
                match max_tokens.checked_sub(directive_cost) {
                    Some(remaining) if remaining > 0 => self.fitting_suffix_start(body, remaining),
                    _ => body.len(),
                }
            }
        };

        let mut selected = Vec::with_capacity(body.len() - start + 1);
        selected.extend(directive.cloned());
        selected.extend_from_slice(&body[start..]);
        selected
    }

    /// Select and report buffer statistics
    pub fn prepare(&self, conversation: &[ChatMessage]) -> BufferSelection {
        let messages = self.select(conversation);
        let stats = BufferStats {
            messages_in_buffer: messages.len(),
            total_messages: conversation.len(),
            tokens_in_buffer: self.estimator.estimate_conversation(&messages),
            total_tokens: self.estimator.estimate_conversation(conversation),
            dropped_messages: conversation.len() - messages.len(),
        };

        debug!(
            budget = %self.budget,
            kept = stats.messages_in_buffer,
            dropped = stats.dropped_messages,
            tokens = stats.tokens_in_buffer,
            "Selected conversation context"
        );

        BufferSelection { messages, stats }
    }

    /// Index where the newest run of messages fitting in `remaining` tokens begins
    fn fitting_suffix_start(&self, body: &[ChatMessage], remaining: usize) -> usize {
        let mut used = 0;
        let mut start = body.len();

        for (index, message) in body.iter().enumerate().rev() {
            let cost = self.estimator.estimate_message(message);
            if used + cost > remaining {
                break;
            }
            used += cost;
            start = index;
        }

        start
    }
}

/// Index where the most recent `exchanges` exchanges of `body` begin
///
/// Walks backward one exchange at a time. An assistant message directly
/// preceded by a user message closes a pair; any other message (a trailing
/// unanswered user turn, an orphan assistant reply, a mid-dialogue system
/// message) is an exchange on its own.
fn recent_exchanges_start(body: &[ChatMessage], exchanges: usize) -> usize {
    let mut start = body.len();
    let mut kept = 0;

    while start > 0 && kept < exchanges {
        start -= 1;
        if body[start].is_assistant() && start > 0 && body[start - 1].is_user() {
            start -= 1;
        }
        kept += 1;
    }

    start
}

/// Messages chosen for a model call together with their statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferSelection {
    pub messages: Vec<ChatMessage>,
    pub stats: BufferStats,
}

/// Size of the selected context relative to the full conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BufferStats {
    pub messages_in_buffer: usize,
    pub total_messages: usize,
    pub tokens_in_buffer: usize,
    pub total_tokens: usize,
    pub dropped_messages: usize,
}

impl BufferStats {
    /// Whether any history was left out of the buffer
    pub fn is_truncated(&self) -> bool {
        self.dropped_messages > 0
    }
}

impl std::fmt::Display for BufferStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "messages in buffer: {}/{}, approx tokens in buffer: ~{} (total ~{})",
            self.messages_in_buffer, self.total_messages, self.tokens_in_buffer, self.total_tokens
        )
    }
}
