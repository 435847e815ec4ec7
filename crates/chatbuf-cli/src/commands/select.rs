//! One-shot selection over a stored conversation

use anyhow::Context;
use chatbuf_core::llm::parse_conversation_json;
use chatbuf_core::{BufferSelection, ChatConfig, ContextBuffer};
use colored::*;
use std::fs;
use std::path::Path;

/// Read `file`, apply the configured budget and print the selection
///
/// The selected messages go to stdout as JSON; statistics go to stderr so
/// the output can be piped.
pub fn execute(config: &ChatConfig, file: &Path) -> anyhow::Result<()> {
    let selection = select_file(config, file)?;

    println!("{}", serde_json::to_string_pretty(&selection.messages)?);
    eprintln!(
        "{} {}\n{}",
        "budget:".dimmed(),
        config.budget,
        selection.stats.to_string().dimmed()
    );
    Ok(())
}

fn select_file(config: &ChatConfig, file: &Path) -> anyhow::Result<BufferSelection> {
    let content = fs::read_to_string(file)
        .with_context(|| format!("Failed to read conversation file: {}", file.display()))?;
    let conversation = parse_conversation_json(&content)
        .with_context(|| format!("Invalid conversation in {}", file.display()))?;

    let buffer = ContextBuffer::with_estimator(config.budget, config.estimator);
    Ok(buffer.prepare(&conversation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatbuf_core::{Budget, ChatMessage};
    use tempfile::TempDir;

    const HISTORY: &str = r#"[
        {"role": "system", "content": "You are helpful."},
        {"role": "user", "content": "Hi"},
        {"role": "assistant", "content": "Hello!"},
        {"role": "user", "content": "Tell me a joke"},
        {"role": "assistant", "content": "Why did the chicken cross the road?"},
        {"role": "user", "content": "Why?"}
    ]"#;

    fn write_history(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("history.json");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_select_file_applies_budget() {
        let dir = TempDir::new().unwrap();
        let path = write_history(&dir, HISTORY);
        let config = ChatConfig {
            budget: Budget::exchanges(1),
            ..ChatConfig::default()
        };

        let selection = select_file(&config, &path).unwrap();
        assert_eq!(
            selection.messages,
            vec![ChatMessage::system("You are helpful."), ChatMessage::user("Why?")]
        );
        assert_eq!(selection.stats.total_messages, 6);
        assert_eq!(selection.stats.dropped_messages, 4);
    }

    #[test]
    fn test_select_file_reports_malformed_message() {
        let dir = TempDir::new().unwrap();
        let path = write_history(&dir, r#"[{"role": "user", "content": "Hi"}, {"role": "user"}]"#);

        let err = select_file(&ChatConfig::default(), &path).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("Invalid conversation"));
        assert!(message.contains("content"));
    }

    #[test]
    fn test_select_file_missing() {
        let dir = TempDir::new().unwrap();
        let err = select_file(&ChatConfig::default(), &dir.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read conversation file"));
    }
}
