//! OpenAI-compatible SSE stream parser

use crate::error::{ChatError, ChatResult};
use crate::llm::streaming::{CompletionStream, StreamChunk};
use futures::{Stream, StreamExt, future, stream};
use serde_json::Value;

/// Parse an OpenAI-compatible SSE byte stream into a [`CompletionStream`].
///
/// - Lines prefixed with `data:`
/// - JSON with `choices[0].delta.content`
/// - `[DONE]` termination marker
///
/// Network chunks may end mid-line; partial lines are held back until the
/// rest arrives. A final line without a trailing newline is parsed when the
/// byte stream ends.
pub fn openai_sse_stream<S, B, E>(byte_stream: S) -> CompletionStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let chunks = byte_stream
        .map(Some)
        .chain(stream::once(future::ready(None)))
        .scan(SseLineBuffer::default(), |buffer, item| {
            let items = match item {
                Some(Ok(bytes)) => buffer.feed(bytes.as_ref()),
                Some(Err(e)) => vec![Err(ChatError::llm(format!("Stream error: {}", e)))],
                None => buffer.finish(),
            };
            future::ready(Some(items))
        })
        .flat_map(stream::iter);

    Box::pin(chunks)
}

/// Accumulates raw bytes and yields one parsed chunk per complete `data:` line
#[derive(Debug, Default)]
struct SseLineBuffer {
    pending: Vec<u8>,
}

impl SseLineBuffer {
    fn feed(&mut self, bytes: &[u8]) -> Vec<ChatResult<StreamChunk>> {
        self.pending.extend_from_slice(bytes);

        let mut chunks = Vec::new();
        while let Some(newline) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&line);
            if let Some(chunk) = parse_line(line.trim_end_matches(['\n', '\r'])) {
                chunks.push(chunk);
            }
        }
        chunks
    }

    /// Parse whatever is left once the byte stream has ended
    fn finish(&mut self) -> Vec<ChatResult<StreamChunk>> {
        let rest = std::mem::take(&mut self.pending);
        let line = String::from_utf8_lossy(&rest);
        parse_line(line.trim_end_matches(['\n', '\r']))
            .into_iter()
            .collect()
    }
}

/// Parse one SSE line; comments, blank lines and non-data fields yield nothing
fn parse_line(line: &str) -> Option<ChatResult<StreamChunk>> {
    let data = line.strip_prefix("data:")?.trim_start();

    if data == "[DONE]" {
        return Some(Ok(StreamChunk::final_chunk(Some("stop".to_string()))));
    }

    let json: Value = match serde_json::from_str(data) {
        Ok(json) => json,
        Err(e) => {
            return Some(Err(ChatError::json(format!(
                "Invalid stream event payload: {}",
                e
            ))));
        }
    };

    if let Some(message) = json["error"]["message"].as_str() {
        return Some(Err(ChatError::llm(format!("Stream error: {}", message))));
    }

    json["choices"][0]["delta"]["content"]
        .as_str()
        .filter(|content| !content.is_empty())
        .map(|content| Ok(StreamChunk::content(content)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::stream_utils::collect_stream;

    fn byte_chunks(parts: &[&str]) -> CompletionStream {
        let items: Vec<Result<Vec<u8>, std::io::Error>> =
            parts.iter().map(|p| Ok(p.as_bytes().to_vec())).collect();
        openai_sse_stream(stream::iter(items))
    }

    #[tokio::test]
    async fn test_parses_content_deltas_and_done() {
        let stream = byte_chunks(&[
            "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n\n",
            "data: [DONE]\n\n",
        ]);
        let reply = collect_stream(stream, |_| {}).await.unwrap();
        assert_eq!(reply, "Hello");
    }

    #[tokio::test]
    async fn test_handles_events_split_across_chunks() {
        let stream = byte_chunks(&[
            "data: {\"choices\":[{\"del",
            "ta\":{\"content\":\"split\"}}]}\r\n\r\n: keep-alive\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\" ok\"}}]}\n",
            "data: [DONE]\n",
        ]);
        let mut fragments = Vec::new();
        let reply = collect_stream(stream, |f| fragments.push(f.to_string()))
            .await
            .unwrap();
        assert_eq!(reply, "split ok");
        assert_eq!(fragments, vec!["split", " ok"]);
    }

    #[tokio::test]
    async fn test_final_event_without_newline_is_kept() {
        let stream = byte_chunks(&[
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hello\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\" world\"}}]}",
        ]);
        let reply = collect_stream(stream, |_| {}).await.unwrap();
        assert_eq!(reply, "Hello world");
    }

    #[tokio::test]
    async fn test_truncated_final_event_is_an_error() {
        let stream = byte_chunks(&[
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n",
            "data: {\"choices\":[{\"del",
        ]);
        let err = collect_stream(stream, |_| {}).await.unwrap_err();
        assert!(matches!(err, ChatError::Json { .. }));
    }

    #[test]
    fn test_finish_with_empty_buffer_yields_nothing() {
        let mut buffer = SseLineBuffer::default();
        assert_eq!(buffer.feed(b"data: [DONE]\n").len(), 1);
        assert!(buffer.finish().is_empty());
    }

    #[tokio::test]
    async fn test_surfaces_error_events() {
        let stream = byte_chunks(&["data: {\"error\":{\"message\":\"rate limited\"}}\n"]);
        let err = collect_stream(stream, |_| {}).await.unwrap_err();
        assert!(err.to_string().contains("rate limited"));
    }

    #[tokio::test]
    async fn test_transport_error_becomes_llm_error() {
        let items: Vec<Result<Vec<u8>, String>> = vec![
            Ok(b"data: {\"choices\":[{\"delta\":{\"content\":\"a\"}}]}\n".to_vec()),
            Err("reset by peer".to_string()),
        ];
        let err = collect_stream(openai_sse_stream(stream::iter(items)), |_| {})
            .await
            .unwrap_err();
        assert_eq!(err, ChatError::llm("Stream error: reset by peer"));
    }

    #[test]
    fn test_parse_line_ignores_non_data() {
        assert!(parse_line("").is_none());
        assert!(parse_line(": comment").is_none());
        assert!(parse_line("event: ping").is_none());
    }
}
