//! Completion provider trait

use crate::error::ChatResult;
use crate::llm::messages::ChatMessage;
use crate::llm::streaming::CompletionStream;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single completion request: the selected context plus the model to run it on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model identifier, e.g. `gpt-4o-mini`
    pub model: String,
    /// Messages to send, already bounded by the context buffer
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature override
    pub temperature: Option<f32>,
    /// Reply length cap, in tokens
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Unified trait for all completion providers
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider name, used in logs and errors
    fn name(&self) -> &'static str;

    /// Send a chat completion request and wait for the whole reply
    async fn complete(&self, request: &CompletionRequest) -> ChatResult<String>;

    /// Send a streaming chat completion request
    async fn complete_stream(&self, request: &CompletionRequest) -> ChatResult<CompletionStream>;
}
