//! Environment variable-based configuration

use crate::context::Budget;
use crate::error::{ChatError, ChatResult};
use std::str::FromStr;

use super::model::ChatConfig;

/// Apply overrides from the process environment
///
/// | variable                | field                     |
/// |-------------------------|---------------------------|
/// | `CHATBUF_MODEL`         | `model`                   |
/// | `CHATBUF_PROVIDER`      | `provider.kind`           |
/// | `CHATBUF_BASE_URL`      | `provider.base_url`       |
/// | `OPENAI_API_KEY`        | `provider.api_key`        |
/// | `CHATBUF_EXCHANGES`     | `budget` (count)          |
/// | `CHATBUF_MAX_TOKENS`    | `budget` (tokens)         |
/// | `CHATBUF_SYSTEM_PROMPT` | `system_prompt`           |
/// | `CHATBUF_LOG_LEVEL`     | `logging.level`           |
pub fn apply_process_env(config: &mut ChatConfig) -> ChatResult<()> {
    apply_env(config, |key| std::env::var(key).ok())
}

/// Apply overrides read through `lookup`
///
/// `CHATBUF_MAX_TOKENS` wins over `CHATBUF_EXCHANGES` when both are set.
/// Negative budgets are accepted and mean "directive only".
pub fn apply_env<F>(config: &mut ChatConfig, lookup: F) -> ChatResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(model) = var("CHATBUF_MODEL") {
        config.model = model;
    }
    if let Some(provider) = var("CHATBUF_PROVIDER") {
        config.provider.kind = provider.parse().map_err(|_| {
            ChatError::config(format!("Invalid CHATBUF_PROVIDER value: {}", provider))
        })?;
    }
    if let Some(base_url) = var("CHATBUF_BASE_URL") {
        config.provider.base_url = base_url;
    }
    if let Some(api_key) = var("OPENAI_API_KEY") {
        config.provider.api_key = Some(api_key);
    }
    if let Some(exchanges) = var("CHATBUF_EXCHANGES") {
        config.budget = Budget::exchanges_signed(parse_number("CHATBUF_EXCHANGES", &exchanges)?);
    }
    if let Some(max_tokens) = var("CHATBUF_MAX_TOKENS") {
        config.budget = Budget::tokens_signed(parse_number("CHATBUF_MAX_TOKENS", &max_tokens)?);
    }
    if let Some(prompt) = var("CHATBUF_SYSTEM_PROMPT") {
        config.system_prompt = Some(prompt);
    }
    if let Some(level) = var("CHATBUF_LOG_LEVEL") {
        config.logging.level = level;
    }

    Ok(())
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> ChatResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ChatError::config(format!("Invalid {} value: {}", key, value)))
}
