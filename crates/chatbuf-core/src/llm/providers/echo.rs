//! Echo provider
//!
//! Never calls a model. Replies with the last user message and the size of
//! the context it was given, which makes the effect of the context buffer
//! visible without network access or an API key.

use crate::error::ChatResult;
use crate::llm::provider_trait::{CompletionProvider, CompletionRequest};
use crate::llm::streaming::{CompletionStream, stream_utils};
use async_trait::async_trait;
use tracing::debug;

/// Offline provider that echoes the latest user message
#[derive(Debug, Clone, Default)]
pub struct EchoProvider;

impl EchoProvider {
    pub fn new() -> Self {
        Self
    }

    fn reply_for(request: &CompletionRequest) -> String {
        let last_user = request
            .messages
            .iter()
            .rev()
            .find(|m| m.is_user())
            .map(|m| m.content.as_str())
            .unwrap_or("");

        format!(
            "[echo:{} | {} messages in context] {}",
            request.model,
            request.messages.len(),
            last_user
        )
    }
}

#[async_trait]
impl CompletionProvider for EchoProvider {
    fn name(&self) -> &'static str {
        "echo"
    }

    async fn complete(&self, request: &CompletionRequest) -> ChatResult<String> {
        debug!(messages = request.messages.len(), "Echo completion");
        Ok(Self::reply_for(request))
    }

    async fn complete_stream(&self, request: &CompletionRequest) -> ChatResult<CompletionStream> {
        let reply = Self::reply_for(request);
        let words: Vec<String> = reply.split_inclusive(' ').map(str::to_string).collect();
        Ok(stream_utils::from_fragments(words))
    }
}
