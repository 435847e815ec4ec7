//! Integration tests for chatbuf core
//!
//! Drives whole sessions through the public API: JSON history in, context
//! selection, provider call, history out.

use chatbuf_core::{
    Budget, ChatMessage, ChatResult, ChatSession, Conversation, ContextBuffer, EchoProvider,
    ReplySource, llm::parse_conversation_json, select,
};
use std::sync::Arc;

const HISTORY: &str = r#"[
    {"role": "system", "content": "You are a helpful assistant for kids."},
    {"role": "user", "content": "What is a volcano?"},
    {"role": "assistant", "content": "A mountain that can erupt. Do you want more info?"},
    {"role": "user", "content": "yes"},
    {"role": "assistant", "content": "Lava is melted rock. Do you want more info?"},
    {"role": "user", "content": "What about earthquakes?"}
]"#;

#[test]
fn test_select_from_parsed_history() -> ChatResult<()> {
    let history = parse_conversation_json(HISTORY)?;

    let selected = select(&history, Budget::exchanges(1));
    assert_eq!(
        selected,
        vec![
            ChatMessage::system("You are a helpful assistant for kids."),
            ChatMessage::user("What about earthquakes?"),
        ]
    );

    let selected = select(&history, Budget::exchanges(2));
    assert_eq!(selected.len(), 4);
    assert_eq!(selected[1], ChatMessage::user("yes"));
    Ok(())
}

#[test]
fn test_malformed_history_fails_fast() {
    let err = parse_conversation_json(r#"[{"role": "user", "content": "hi"}, {"content": "no role"}]"#)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Malformed message at index 1: missing field `role`"
    );
}

#[test]
fn test_token_budget_stats_match_selection() -> ChatResult<()> {
    let history = parse_conversation_json(HISTORY)?;
    let buffer = ContextBuffer::new(Budget::tokens(60));
    let selection = buffer.prepare(&history);

    assert!(selection.messages[0].is_system());
    assert!(selection.stats.tokens_in_buffer <= 60);
    assert_eq!(
        selection.stats.dropped_messages,
        history.len() - selection.messages.len()
    );
    Ok(())
}

#[tokio::test]
async fn test_session_resumes_parsed_history() -> ChatResult<()> {
    let history = parse_conversation_json(HISTORY)?;
    let mut session = ChatSession::new(Arc::new(EchoProvider::new()), "echo-model", Budget::exchanges(1))
        .with_conversation(Conversation::from_messages(history));

    let outcome = session.send("Tell me about tornadoes").await?;

    assert_eq!(outcome.source, ReplySource::Model);
    // Directive plus the new user message only.
    assert_eq!(
        outcome.reply,
        "[echo:echo-model | 2 messages in context] Tell me about tornadoes"
    );
    assert_eq!(session.conversation().len(), 8);
    Ok(())
}

#[tokio::test]
async fn test_streaming_session_with_echo() -> ChatResult<()> {
    let mut session = ChatSession::new(Arc::new(EchoProvider::new()), "m", Budget::tokens(200))
        .with_directive("Be brief.");

    let mut streamed = String::new();
    let outcome = session
        .send_streaming("hello there", |fragment| streamed.push_str(fragment))
        .await?;

    assert_eq!(streamed, outcome.reply);
    assert!(outcome.reply.ends_with("hello there"));
    Ok(())
}
