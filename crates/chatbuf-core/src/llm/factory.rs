//! Provider selection

use crate::config::ProviderSettings;
use crate::error::{ChatError, ChatResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

use super::provider_trait::CompletionProvider;
use super::providers::{EchoProvider, OpenAiProvider};

/// Which completion backend to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI or any OpenAI-compatible server
    #[default]
    OpenAi,
    /// Offline echo, no network
    Echo,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Echo => "echo",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "echo" => Ok(Self::Echo),
            other => Err(ChatError::invalid_field(
                format!("unknown provider `{}` (expected `openai` or `echo`)", other),
                "provider",
            )),
        }
    }
}

/// Build the provider described by `settings`
pub fn create_provider(settings: &ProviderSettings) -> ChatResult<Arc<dyn CompletionProvider>> {
    match settings.kind {
        ProviderKind::OpenAi => Ok(Arc::new(OpenAiProvider::new(settings.clone())?)),
        ProviderKind::Echo => Ok(Arc::new(EchoProvider::new())),
    }
}
