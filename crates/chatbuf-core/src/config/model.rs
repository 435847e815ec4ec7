//! Configuration data model

use crate::context::{Budget, TokenEstimator};
use crate::error::{ChatError, ChatResult};
use crate::llm::ProviderKind;
use crate::session::FollowUpGate;
use serde::{Deserialize, Serialize};

use super::logging_config::LoggingConfig;

/// Default model identifier
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default OpenAI API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Completion provider connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    pub base_url: String,
    /// API key; usually supplied through `OPENAI_API_KEY` rather than a file
    pub api_key: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub timeout_secs: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            kind: ProviderKind::OpenAi,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            temperature: Some(0.7),
            max_tokens: None,
            timeout_secs: 60,
        }
    }
}

/// Top-level chat configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Model identifier sent with every request
    pub model: String,
    pub provider: ProviderSettings,
    /// History budget applied before each model call
    pub budget: Budget,
    /// System directive placed at the head of the conversation
    pub system_prompt: Option<String>,
    /// Enables the yes/no follow-up gate when present
    pub follow_up: Option<FollowUpGate>,
    pub estimator: TokenEstimator,
    pub logging: LoggingConfig,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            provider: ProviderSettings::default(),
            budget: Budget::default(),
            system_prompt: None,
            follow_up: None,
            estimator: TokenEstimator::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ChatConfig {
    /// Check the configuration is usable
    pub fn validate(&self) -> ChatResult<()> {
        if self.model.trim().is_empty() {
            return Err(ChatError::config("model must not be empty"));
        }

        if self.provider.kind == ProviderKind::OpenAi
            && self.provider.api_key.as_deref().is_none_or(|k| k.trim().is_empty())
        {
            return Err(ChatError::config_with_context(
                "missing API key for the openai provider",
                "set OPENAI_API_KEY or provider.api_key, or use the echo provider",
            ));
        }

        if let Some(temperature) = self.provider.temperature {
            if !temperature.is_finite() || temperature < 0.0 {
                return Err(ChatError::config(format!(
                    "temperature must be a non-negative number, got {}",
                    temperature
                )));
            }
        }

        if self.estimator.chars_per_token == 0 {
            return Err(ChatError::config("estimator.chars_per_token must be at least 1"));
        }

        Ok(())
    }
}
