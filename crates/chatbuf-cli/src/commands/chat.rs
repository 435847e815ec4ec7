//! Interactive chat loop

use super::slash::{self, HELP_TEXT, SlashCommand};
use chatbuf_core::session::KIDS_DIRECTIVE;
use chatbuf_core::{ChatConfig, ChatSession, ReplySource, create_provider};
use colored::*;
use std::io::Write;
use std::ops::ControlFlow;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Run the interactive chat until `/quit` or end of input
pub async fn execute(mut config: ChatConfig, stream: bool) -> anyhow::Result<()> {
    // The gate only fires if the model is told to ask the question.
    if config.follow_up.is_some() && config.system_prompt.is_none() {
        config.system_prompt = Some(KIDS_DIRECTIVE.to_string());
    }
    config.validate()?;

    let provider = create_provider(&config.provider)?;
    let mut session = ChatSession::from_config(&config, provider);
    tracing::info!(session = %session.id(), model = %session.model(), "Chat session started");

    print_banner(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", "you>".green().bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match slash::parse(&line) {
            Some(Ok(command)) => {
                if handle_command(&mut session, command).is_break() {
                    break;
                }
            }
            Some(Err(usage)) => eprintln!("{}", usage.yellow()),
            None => run_turn(&mut session, &line, stream).await?,
        }
    }

    println!("{}", "Goodbye!".dimmed());
    Ok(())
}

fn print_banner(session: &ChatSession) {
    println!("{}", "chatbuf".bold().underline());
    println!(
        "{} {}  {} {}  {} {}",
        "model:".dimmed(),
        session.model(),
        "provider:".dimmed(),
        session.provider_name(),
        "history:".dimmed(),
        session.budget()
    );
    println!("{}", "Type /help for commands.".dimmed());
    println!();
}

/// Apply a slash command to the session; `Break` ends the chat
pub fn handle_command(session: &mut ChatSession, command: SlashCommand) -> ControlFlow<()> {
    match command {
        SlashCommand::Help => println!("{HELP_TEXT}"),
        SlashCommand::Stats => {
            println!("{} {}", "budget:".dimmed(), session.budget());
            println!("{}", session.stats());
        }
        SlashCommand::Clear => {
            session.reset();
            println!("{}", "Conversation cleared.".green());
        }
        SlashCommand::Budget(budget) => {
            session.set_budget(budget);
            println!("{} {}", "History budget set to".green(), budget);
        }
        SlashCommand::Model(model) => {
            session.set_model(model);
            println!("{} {}", "Model set to".green(), session.model());
        }
        SlashCommand::Quit => return ControlFlow::Break(()),
    }
    ControlFlow::Continue(())
}

/// Send one user message and print the reply
///
/// Provider failures are reported and the chat continues; only terminal
/// write errors end it.
async fn run_turn(session: &mut ChatSession, input: &str, stream: bool) -> anyhow::Result<()> {
    print!("{} ", "assistant>".cyan().bold());
    std::io::stdout().flush()?;

    let outcome = if stream {
        session
            .send_streaming(input, |fragment| {
                print!("{fragment}");
                let _ = std::io::stdout().flush();
            })
            .await
    } else {
        session.send(input).await.inspect(|outcome| print!("{}", outcome.reply))
    };
    println!();

    match outcome {
        Ok(outcome) if outcome.source == ReplySource::Model && outcome.stats.is_truncated() => {
            println!("{}", format!("({})", outcome.stats).dimmed());
        }
        Ok(_) => {}
        Err(e) => eprintln!(
            "{} {} {}",
            "✗".red().bold(),
            e.to_string().red(),
            format!("[{}]", e.error_code()).dimmed()
        ),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatbuf_core::{Budget, EchoProvider};
    use std::sync::Arc;

    fn echo_session() -> ChatSession {
        ChatSession::new(Arc::new(EchoProvider::new()), "echo-model", Budget::exchanges(2))
            .with_directive("Be nice.")
    }

    #[test]
    fn test_budget_command_updates_session() {
        let mut session = echo_session();
        let flow = handle_command(&mut session, SlashCommand::Budget(Budget::tokens(300)));
        assert!(flow.is_continue());
        assert_eq!(session.budget(), Budget::tokens(300));
    }

    #[test]
    fn test_model_command_updates_session() {
        let mut session = echo_session();
        let _ = handle_command(&mut session, SlashCommand::Model("other".to_string()));
        assert_eq!(session.model(), "other");
    }

    #[test]
    fn test_quit_breaks() {
        let mut session = echo_session();
        assert!(handle_command(&mut session, SlashCommand::Quit).is_break());
    }

    #[tokio::test]
    async fn test_clear_keeps_directive() {
        let mut session = echo_session();
        run_turn(&mut session, "hello", false).await.unwrap();
        run_turn(&mut session, "again", true).await.unwrap();
        assert_eq!(session.conversation().len(), 5);

        let _ = handle_command(&mut session, SlashCommand::Clear);
        assert_eq!(session.conversation().len(), 1);
        assert_eq!(
            session.conversation().directive().map(|m| m.content.as_str()),
            Some("Be nice.")
        );
    }
}
