//! Configuration loading and management

use crate::context::Budget;
use crate::error::ChatResult;
use crate::llm::ProviderKind;
use crate::session::FollowUpGate;
use std::path::{Path, PathBuf};

use super::env_loader::apply_process_env;
use super::file_loader::load_from_file;
use super::model::ChatConfig;

/// Values given on the command line; `None` leaves the lower layer alone
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub model: Option<String>,
    pub provider: Option<ProviderKind>,
    pub budget: Option<Budget>,
    pub system_prompt: Option<String>,
    pub follow_up: bool,
    pub log_level: Option<String>,
}

impl ConfigOverrides {
    fn apply(&self, config: &mut ChatConfig) {
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(provider) = self.provider {
            config.provider.kind = provider;
        }
        if let Some(budget) = self.budget {
            config.budget = budget;
        }
        if let Some(prompt) = &self.system_prompt {
            config.system_prompt = Some(prompt.clone());
        }
        if self.follow_up && config.follow_up.is_none() {
            config.follow_up = Some(FollowUpGate::default());
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}

/// Source of configuration data
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// Configuration from a file; replaces everything loaded before it
    File(PathBuf),
    /// Configuration from environment variables
    Environment,
    /// Configuration from command line arguments
    CommandLine(ConfigOverrides),
}

/// Configuration loader with support for multiple sources
///
/// Sources are applied in the order they were added, on top of the
/// defaults. The result is validated before it is returned.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    sources: Vec<ConfigSource>,
}

impl ConfigLoader {
    /// Create a new config loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a configuration source
    pub fn add_source(mut self, source: ConfigSource) -> Self {
        self.sources.push(source);
        self
    }

    /// Add a file source
    pub fn with_file<P: AsRef<Path>>(self, path: P) -> Self {
        self.add_source(ConfigSource::File(path.as_ref().to_path_buf()))
    }

    /// Add environment variables source
    pub fn with_env(self) -> Self {
        self.add_source(ConfigSource::Environment)
    }

    /// Add command line arguments source
    pub fn with_overrides(self, overrides: ConfigOverrides) -> Self {
        self.add_source(ConfigSource::CommandLine(overrides))
    }

    /// Load configuration from all sources without validating it
    pub fn load_unvalidated(&self) -> ChatResult<ChatConfig> {
        let mut config = ChatConfig::default();

        for source in &self.sources {
            match source {
                ConfigSource::File(path) => {
                    tracing::debug!("Loading config from file: {}", path.display());
                    config = load_from_file(path)?;
                }
                ConfigSource::Environment => {
                    tracing::debug!("Loading config from environment");
                    apply_process_env(&mut config)?;
                }
                ConfigSource::CommandLine(overrides) => {
                    tracing::debug!("Applying command line overrides");
                    overrides.apply(&mut config);
                }
            }
        }

        tracing::debug!(
            model = %config.model,
            provider = %config.provider.kind,
            budget = %config.budget,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Load and validate configuration from all sources
    pub fn load(&self) -> ChatResult<ChatConfig> {
        let config = self.load_unvalidated()?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChatError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_file_then_overrides() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("chatbuf.toml");
        fs::write(
            &path,
            "model = \"gpt-4\"\n[provider]\nkind = \"echo\"\n[budget]\nkind = \"count\"\nexchanges = 3\n",
        )
        .unwrap();

        let config = ConfigLoader::new()
            .with_file(&path)
            .with_overrides(ConfigOverrides {
                budget: Some(Budget::tokens(300)),
                follow_up: true,
                ..ConfigOverrides::default()
            })
            .load()
            .unwrap();

        assert_eq!(config.model, "gpt-4");
        assert_eq!(config.budget, Budget::tokens(300));
        assert_eq!(config.follow_up, Some(FollowUpGate::default()));
    }

    #[test]
    fn test_overrides_only_touch_given_fields() {
        let config = ConfigLoader::new()
            .with_overrides(ConfigOverrides {
                provider: Some(ProviderKind::Echo),
                ..ConfigOverrides::default()
            })
            .load()
            .unwrap();

        assert_eq!(config.provider.kind, ProviderKind::Echo);
        assert_eq!(config.model, ChatConfig::default().model);
        assert_eq!(config.budget, Budget::default());
    }

    #[test]
    fn test_load_validates() {
        let err = ConfigLoader::new().load().unwrap_err();
        assert!(matches!(err, ChatError::Config { .. }));
        assert!(ConfigLoader::new().load_unvalidated().is_ok());
    }
}
