//! Slash commands available in the interactive chat

use chatbuf_core::Budget;

/// A parsed `/command` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    Help,
    Stats,
    Clear,
    Budget(Budget),
    Model(String),
    Quit,
}

pub const HELP_TEXT: &str = "\
/stats                 show how much history the next request carries
/clear                 forget the conversation, keep the system directive
/budget count <N>      keep the last N exchanges
/budget tokens <N>     keep as much recent history as fits in ~N tokens
/model <name>          switch model for the following turns
/quit                  leave the chat";

/// Parse a line of input as a slash command
///
/// Returns `None` when the line is not a command and should be sent to the
/// model, and `Some(Err(_))` with a usage message for a malformed command.
pub fn parse(input: &str) -> Option<Result<SlashCommand, String>> {
    let rest = input.trim().strip_prefix('/')?;
    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    let command = match (name, args.as_slice()) {
        ("help" | "h" | "?", []) => Ok(SlashCommand::Help),
        ("stats", []) => Ok(SlashCommand::Stats),
        ("clear" | "reset", []) => Ok(SlashCommand::Clear),
        ("quit" | "exit" | "q", []) => Ok(SlashCommand::Quit),
        ("budget", args) => parse_budget(args).map(SlashCommand::Budget),
        ("model", [model]) => Ok(SlashCommand::Model((*model).to_string())),
        ("model", _) => Err("usage: /model <name>".to_string()),
        (other, _) => Err(format!("unknown command `/{other}`, try /help")),
    };
    Some(command)
}

fn parse_budget(args: &[&str]) -> Result<Budget, String> {
    const USAGE: &str = "usage: /budget count <N> | /budget tokens <N>";

    let [kind, value] = args else {
        return Err(USAGE.to_string());
    };
    let value: i64 = value
        .parse()
        .map_err(|_| format!("`{value}` is not a whole number; {USAGE}"))?;

    match *kind {
        "count" | "exchanges" => Ok(Budget::exchanges_signed(value)),
        "tokens" => Ok(Budget::tokens_signed(value)),
        _ => Err(USAGE.to_string()),
    }
}
