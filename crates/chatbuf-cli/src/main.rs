//! chatbuf command-line client
//!
//! Talks to a chat-completion model while forwarding only a bounded window
//! of the conversation history with each request.
//!
//! # Modes
//!
//! - `chatbuf` or `chatbuf chat`: interactive conversation on stdin. Slash
//!   commands `/stats`, `/clear`, `/budget` and `/quit` manage the session.
//! - `chatbuf select <file.json>`: apply a budget to a stored conversation
//!   and print the messages that would be sent.
//!
//! Configuration is read from `chatbuf.toml` (or `--config`), then
//! `CHATBUF_*` and `OPENAI_API_KEY` environment variables, then flags.

mod args;
mod commands;
mod logging;
mod router;

use args::Cli;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    router::route(cli).await
}
