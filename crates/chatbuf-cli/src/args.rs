//! CLI argument definitions

use chatbuf_core::{Budget, ConfigLoader, ConfigOverrides, ProviderKind};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Config file read when `--config` is not given; a missing file is fine
pub const DEFAULT_CONFIG_FILE: &str = "chatbuf.toml";

#[derive(Parser, Debug)]
#[command(name = "chatbuf")]
#[command(about = "Chat with a language model over a bounded context buffer")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file (toml, yaml or json)
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Model to use
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Completion provider (openai, echo)
    #[arg(long, global = true)]
    pub provider: Option<ProviderKind>,

    /// Keep only the last N exchanges of history
    #[arg(
        long,
        global = true,
        allow_negative_numbers = true,
        conflicts_with = "max_tokens"
    )]
    pub exchanges: Option<i64>,

    /// Keep as much recent history as fits in roughly N tokens
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub max_tokens: Option<i64>,

    /// System directive placed at the head of the conversation
    #[arg(long, global = true)]
    pub system: Option<String>,

    /// Print replies only once they are complete
    #[arg(long, global = true)]
    pub no_stream: bool,

    /// Ask "Do you want more info?" after each answer and gate the next turn
    #[arg(long, global = true)]
    pub follow_up: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Start an interactive chat (default)
    Chat,

    /// Apply a budget to a conversation stored as a JSON array of messages
    Select {
        /// JSON file holding `[{"role": ..., "content": ...}, ...]`
        file: PathBuf,
    },
}

impl Cli {
    /// Budget requested on the command line, if any
    ///
    /// Negative values are accepted and keep the directive only.
    pub fn budget(&self) -> Option<Budget> {
        match (self.exchanges, self.max_tokens) {
            (Some(n), _) => Some(Budget::exchanges_signed(n)),
            (None, Some(n)) => Some(Budget::tokens_signed(n)),
            (None, None) => None,
        }
    }

    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            model: self.model.clone(),
            provider: self.provider,
            budget: self.budget(),
            system_prompt: self.system.clone(),
            follow_up: self.follow_up,
            log_level: self.verbose.then(|| "debug".to_string()),
        }
    }

    /// Defaults, then the config file, then the environment, then flags
    pub fn config_loader(&self) -> ConfigLoader {
        ConfigLoader::new()
            .with_file(&self.config)
            .with_env()
            .with_overrides(self.overrides())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_no_subcommand() {
        let cli = Cli::try_parse_from(["chatbuf"]).unwrap();
        assert_eq!(cli.command, None);
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_FILE));
        assert_eq!(cli.budget(), None);
        assert_eq!(cli.overrides(), ConfigOverrides::default());
    }

    #[test]
    fn test_select_with_budget_after_subcommand() {
        let cli =
            Cli::try_parse_from(["chatbuf", "select", "history.json", "--exchanges", "3"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Select {
                file: PathBuf::from("history.json")
            })
        );
        assert_eq!(cli.budget(), Some(Budget::exchanges(3)));
    }

    #[test]
    fn test_negative_budget_keeps_directive_only() {
        let cli = Cli::try_parse_from(["chatbuf", "--max-tokens", "-5"]).unwrap();
        assert_eq!(cli.budget(), Some(Budget::tokens(0)));
    }

    #[test]
    fn test_budget_flags_conflict() {
        let result = Cli::try_parse_from(["chatbuf", "--exchanges", "2", "--max-tokens", "100"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_from_flags() {
        let cli = Cli::try_parse_from([
            "chatbuf",
            "--model",
            "gpt-4o",
            "--provider",
            "echo",
            "--system",
            "Be brief.",
            "--follow-up",
            "--verbose",
            "chat",
        ])
        .unwrap();

        let overrides = cli.overrides();
        assert_eq!(overrides.model.as_deref(), Some("gpt-4o"));
        assert_eq!(overrides.provider, Some(ProviderKind::Echo));
        assert_eq!(overrides.system_prompt.as_deref(), Some("Be brief."));
        assert!(overrides.follow_up);
        assert_eq!(overrides.log_level.as_deref(), Some("debug"));
        assert_eq!(cli.command, Some(Commands::Chat));
    }

    #[test]
    fn test_unknown_provider_rejected() {
        assert!(Cli::try_parse_from(["chatbuf", "--provider", "carrier-pigeon"]).is_err());
    }
}
