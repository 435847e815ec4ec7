//! chatbuf core library
//!
//! Bounded conversational context for LLM chat clients: the context buffer
//! that decides which part of a conversation is sent with each model call,
//! plus the providers, session state and configuration around it.

pub mod config;
pub mod context;
pub mod error;
pub mod llm;
pub mod session;

// Re-export commonly used types
pub use config::{ChatConfig, ConfigLoader, ConfigOverrides, ProviderSettings};
pub use context::{Budget, BufferSelection, BufferStats, ContextBuffer, TokenEstimator, select};
pub use error::{ChatError, ChatResult};
pub use llm::{
    ChatMessage, CompletionProvider, CompletionRequest, EchoProvider, MessageRole, OpenAiProvider,
    ProviderKind, create_provider,
};
pub use session::{ChatSession, Conversation, FollowUpGate, ReplySource, TurnOutcome};
