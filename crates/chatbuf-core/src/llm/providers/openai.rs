//! OpenAI-compatible chat completions provider

use crate::config::ProviderSettings;
use crate::error::{ChatError, ChatResult};
use crate::llm::provider_trait::{CompletionProvider, CompletionRequest};
use crate::llm::streaming::CompletionStream;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::openai_stream::openai_sse_stream;

const PROVIDER_NAME: &str = "openai";

/// OpenAI provider handler
///
/// Talks to any server exposing `POST {base_url}/chat/completions` with
/// the OpenAI request and SSE streaming formats.
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    settings: ProviderSettings,
    http_client: Client,
}

impl OpenAiProvider {
    /// Create a provider with its own HTTP client
    pub fn new(settings: ProviderSettings) -> ChatResult<Self> {
        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self::with_client(settings, http_client))
    }

    /// Create a provider sharing an existing HTTP client
    pub fn with_client(settings: ProviderSettings, http_client: Client) -> Self {
        Self {
            settings,
            http_client,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.settings.base_url.trim_end_matches('/'))
    }

    fn request_body(&self, request: &CompletionRequest, stream: bool) -> Value {
        let mut body = json!({
            "model": request.model,
            "messages": request.messages,
        });

        if let Some(temperature) = request.temperature.or(self.settings.temperature) {
            body["temperature"] = json!(temperature);
        }
        if let Some(max_tokens) = request.max_tokens.or(self.settings.max_tokens) {
            body["max_tokens"] = json!(max_tokens);
        }
        if stream {
            body["stream"] = json!(true);
        }

        body
    }

    async fn send(&self, body: &Value, timeout: Option<Duration>) -> ChatResult<Response> {
        let mut request = self.http_client.post(self.endpoint()).json(body);

        if let Some(api_key) = &self.settings.api_key {
            request = request.bearer_auth(api_key);
        }
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ChatError::http(format!("OpenAI request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), "OpenAI API returned an error");

        let message = match status {
            StatusCode::UNAUTHORIZED => "Authentication failed: invalid API key".to_string(),
            _ => format!("OpenAI API error (status {}): {}", status, error_text),
        };
        Err(ChatError::llm_status(message, PROVIDER_NAME, status.as_u16()))
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    #[instrument(skip(self, request), fields(model = %request.model, messages = request.messages.len()), level = "debug")]
    async fn complete(&self, request: &CompletionRequest) -> ChatResult<String> {
        let body = self.request_body(request, false);
        let timeout = Duration::from_secs(self.settings.timeout_secs);
        let response = self.send(&body, Some(timeout)).await?;

        let response_json: Value = response
            .json()
            .await
            .context("Failed to deserialize OpenAI API response as JSON")?;

        parse_completion(&response_json)
    }

    #[instrument(skip(self, request), fields(model = %request.model, messages = request.messages.len()), level = "debug")]
    async fn complete_stream(&self, request: &CompletionRequest) -> ChatResult<CompletionStream> {
        let body = self.request_body(request, true);
        let response = self.send(&body, None).await?;
        debug!("OpenAI stream opened");
        Ok(openai_sse_stream(response.bytes_stream()))
    }
}

/// Extract the reply text from a non-streaming completion response
fn parse_completion(response: &Value) -> ChatResult<String> {
    response["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ChatError::llm("OpenAI response contained no message content"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ChatMessage;

    fn provider() -> OpenAiProvider {
        let settings = ProviderSettings {
            base_url: "https://example.test/v1/".to_string(),
            api_key: Some("sk-test".to_string()),
            temperature: Some(0.7),
            max_tokens: None,
            ..ProviderSettings::default()
        };
        OpenAiProvider::with_client(settings, Client::new())
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        assert_eq!(provider().endpoint(), "https://example.test/v1/chat/completions");
    }

    #[test]
    fn test_request_body_uses_selected_messages() {
        let request = CompletionRequest::new(
            "gpt-4o-mini",
            vec![ChatMessage::system("s"), ChatMessage::user("u")],
        )
        .with_max_tokens(256);

        let body = provider().request_body(&request, true);
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(
            body["messages"],
            json!([{"role": "system", "content": "s"}, {"role": "user", "content": "u"}])
        );
        assert_eq!(body["max_tokens"], 256);
        assert_eq!(body["stream"], true);
        assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_request_body_omits_unset_options() {
        let mut settings = ProviderSettings::default();
        settings.temperature = None;
        let provider = OpenAiProvider::with_client(settings, Client::new());

        let body = provider.request_body(&CompletionRequest::new("m", vec![]), false);
        assert!(body.get("temperature").is_none());
        assert!(body.get("max_tokens").is_none());
        assert!(body.get("stream").is_none());
    }

    #[test]
    fn test_parse_completion() {
        let response = json!({
            "choices": [{"message": {"role": "assistant", "content": "Hi there"}}]
        });
        assert_eq!(parse_completion(&response).unwrap(), "Hi there");
        assert!(parse_completion(&json!({"choices": []})).is_err());
    }
}
