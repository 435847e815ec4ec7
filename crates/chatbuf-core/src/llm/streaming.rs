//! Streaming response support for completion providers

use crate::error::ChatResult;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

/// A chunk of streaming response data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamChunk {
    /// Incremental content
    pub content: Option<String>,
    /// Whether this is the final chunk
    pub is_final: bool,
    /// Finish reason (if final)
    pub finish_reason: Option<String>,
}

impl StreamChunk {
    /// Create a new content chunk
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            is_final: false,
            finish_reason: None,
        }
    }

    /// Create a final chunk
    pub fn final_chunk(finish_reason: Option<String>) -> Self {
        Self {
            content: None,
            is_final: true,
            finish_reason,
        }
    }
}

/// Stream of completion chunks
pub type CompletionStream = Pin<Box<dyn Stream<Item = ChatResult<StreamChunk>> + Send>>;

/// Utility functions for working with streams
pub mod stream_utils {
    use super::*;
    use futures::StreamExt;

    /// Collect a stream into the complete reply text
    ///
    /// Each non-empty fragment is passed to `on_fragment` as it arrives.
    /// The first error aborts collection and is returned.
    pub async fn collect_stream<F>(mut stream: CompletionStream, mut on_fragment: F) -> ChatResult<String>
    where
        F: FnMut(&str),
    {
        let mut reply = String::new();

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result?;

            if let Some(fragment) = chunk.content.as_deref() {
                if !fragment.is_empty() {
                    on_fragment(fragment);
                    reply.push_str(fragment);
                }
            }

            if chunk.is_final {
                tracing::debug!(finish_reason = ?chunk.finish_reason, "Stream finished");
                break;
            }
        }

        Ok(reply)
    }

    /// Build a stream from already-known fragments, ending with a final chunk
    pub fn from_fragments<I, S>(fragments: I) -> CompletionStream
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let chunks: Vec<ChatResult<StreamChunk>> = fragments
            .into_iter()
            .map(|f| Ok(StreamChunk::content(f)))
            .chain(std::iter::once(Ok(StreamChunk::final_chunk(Some(
                "stop".to_string(),
            )))))
            .collect();
        Box::pin(futures::stream::iter(chunks))
    }
}

#[cfg(test)]
mod tests {
    use super::stream_utils::{collect_stream, from_fragments};
    use super::*;
    use crate::error::ChatError;
    use futures::stream;

    #[tokio::test]
    async fn test_collect_stream_forwards_fragments() {
        let mut seen = Vec::new();
        let reply = collect_stream(from_fragments(["Hello", ", ", "world"]), |f| {
            seen.push(f.to_string())
        })
        .await
        .unwrap();

        assert_eq!(reply, "Hello, world");
        assert_eq!(seen, vec!["Hello", ", ", "world"]);
    }

    #[tokio::test]
    async fn test_collect_stream_stops_at_final_chunk() {
        let chunks: Vec<ChatResult<StreamChunk>> = vec![
            Ok(StreamChunk::content("done")),
            Ok(StreamChunk::final_chunk(None)),
            Ok(StreamChunk::content("ignored")),
        ];
        let reply = collect_stream(Box::pin(stream::iter(chunks)), |_| {})
            .await
            .unwrap();
        assert_eq!(reply, "done");
    }

    #[tokio::test]
    async fn test_collect_stream_propagates_error() {
        let chunks = vec![
            Ok(StreamChunk::content("partial")),
            Err(ChatError::llm("connection dropped")),
        ];
        let result = collect_stream(Box::pin(stream::iter(chunks)), |_| {}).await;
        assert_eq!(result, Err(ChatError::llm("connection dropped")));
    }
}
