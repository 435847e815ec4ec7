//! Command routing

use crate::args::{Cli, Commands};
use crate::commands;
use crate::logging;

/// Load configuration, set up logging and dispatch to the chosen command
pub async fn route(cli: Cli) -> anyhow::Result<()> {
    let config = cli.config_loader().load_unvalidated()?;
    logging::init(&config.logging)?;

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => commands::chat::execute(config, !cli.no_stream).await,
        Commands::Select { file } => commands::select::execute(&config, &file),
    }
}
