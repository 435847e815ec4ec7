//! Per-user chat session state

use crate::config::ChatConfig;
use crate::context::{Budget, BufferStats, ContextBuffer, TokenEstimator};
use crate::error::{ChatError, ChatResult};
use crate::llm::{ChatMessage, CompletionProvider, CompletionRequest, stream_utils};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::conversation::Conversation;
use super::follow_up::{FollowUpDecision, FollowUpGate};

/// Where a turn's reply came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    /// Generated by the completion provider
    Model,
    /// Fixed reply from the follow-up gate; no model call was made
    Canned,
}

/// Result of one user turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    pub reply: String,
    pub source: ReplySource,
    /// Buffer statistics for the context of this turn
    ///
    /// For a model reply this describes what was sent. For a canned reply no
    /// call is made; it describes what would have been sent, taken before
    /// the canned reply is appended.
    pub stats: BufferStats,
}

/// State of one chat session
///
/// Owns the conversation and the settings that shape each model call. The
/// conversation only grows through [`send`](Self::send) and
/// [`send_streaming`](Self::send_streaming), which append the user message
/// before selecting context and the reply after the call completes.
pub struct ChatSession {
    id: Uuid,
    created_at: DateTime<Utc>,
    model: String,
    buffer: ContextBuffer,
    conversation: Conversation,
    provider: Arc<dyn CompletionProvider>,
    follow_up: Option<FollowUpGate>,
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("id", &self.id)
            .field("model", &self.model)
            .field("budget", &self.buffer.budget())
            .field("messages", &self.conversation.len())
            .field("provider", &self.provider.name())
            .finish()
    }
}

impl ChatSession {
    /// Create an empty session without a directive
    pub fn new(provider: Arc<dyn CompletionProvider>, model: impl Into<String>, budget: Budget) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            model: model.into(),
            buffer: ContextBuffer::new(budget),
            conversation: Conversation::new(),
            provider,
            follow_up: None,
        }
    }

    /// Create a session from loaded configuration
    pub fn from_config(config: &ChatConfig, provider: Arc<dyn CompletionProvider>) -> Self {
        let mut session = Self::new(provider, config.model.clone(), config.budget)
            .with_estimator(config.estimator);
        if let Some(directive) = &config.system_prompt {
            session = session.with_directive(directive.clone());
        }
        if let Some(gate) = &config.follow_up {
            session = session.with_follow_up(gate.clone());
        }
        session
    }

    /// Replace the conversation with one holding only `directive`
    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.conversation = Conversation::with_directive(directive);
        self
    }

    /// Continue from existing history
    pub fn with_conversation(mut self, conversation: Conversation) -> Self {
        self.conversation = conversation;
        self
    }

    pub fn with_follow_up(mut self, gate: FollowUpGate) -> Self {
        self.follow_up = Some(gate);
        self
    }

    pub fn with_estimator(mut self, estimator: TokenEstimator) -> Self {
        self.buffer = ContextBuffer::with_estimator(self.buffer.budget(), estimator);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn budget(&self) -> Budget {
        self.buffer.budget()
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn set_model(&mut self, model: impl Into<String>) {
        self.model = model.into();
    }

    pub fn set_budget(&mut self, budget: Budget) {
        self.buffer = ContextBuffer::with_estimator(budget, *self.buffer.estimator());
    }

    /// Clear the dialogue, keeping the directive
    pub fn reset(&mut self) {
        self.conversation.clear_dialogue();
        info!(session = %self.id, "Conversation cleared");
    }

    /// Statistics for the context the next call would send
    pub fn stats(&self) -> BufferStats {
        self.buffer.prepare(self.conversation.messages()).stats
    }

    /// Run one turn and wait for the whole reply
    pub async fn send(&mut self, input: &str) -> ChatResult<TurnOutcome> {
        self.run_turn(input, None::<fn(&str)>).await
    }

    /// Run one turn, passing reply fragments to `on_fragment` as they arrive
    ///
    /// A fixed follow-up reply is delivered as a single fragment.
    pub async fn send_streaming<F>(&mut self, input: &str, on_fragment: F) -> ChatResult<TurnOutcome>
    where
        F: FnMut(&str),
    {
        self.run_turn(input, Some(on_fragment)).await
    }

    async fn run_turn<F>(&mut self, input: &str, on_fragment: Option<F>) -> ChatResult<TurnOutcome>
    where
        F: FnMut(&str),
    {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ChatError::invalid_field("message must not be empty", "input"));
        }

        let decision = match &self.follow_up {
            Some(gate) => gate.decide(self.conversation.last_assistant(), trimmed),
            None => FollowUpDecision::Forward,
        };

        // Stored exactly as typed.
        self.conversation.push(ChatMessage::user(input));

        if let FollowUpDecision::Reply(reply) = decision {
            debug!(session = %self.id, "Answered follow-up without a model call");
            let stats = self.stats();
            if let Some(mut on_fragment) = on_fragment {
                on_fragment(&reply);
            }
            self.conversation.push(ChatMessage::assistant(reply.clone()));
            return Ok(TurnOutcome {
                reply,
                source: ReplySource::Canned,
                stats,
            });
        }

        let selection = self.buffer.prepare(self.conversation.messages());
        let request = CompletionRequest::new(self.model.clone(), selection.messages);

        let result = match on_fragment {
            Some(on_fragment) => match self.provider.complete_stream(&request).await {
                Ok(stream) => stream_utils::collect_stream(stream, on_fragment).await,
                Err(e) => Err(e),
            },
            None => self.provider.complete(&request).await,
        };

        let reply = result.inspect_err(|e| {
            warn!(
                session = %self.id,
                provider = self.provider.name(),
                code = e.error_code(),
                error = %e,
                "Completion failed"
            );
        })?;

        self.conversation.push(ChatMessage::assistant(reply.clone()));
        Ok(TurnOutcome {
            reply,
            source: ReplySource::Model,
            stats: selection.stats,
        })
    }
}
