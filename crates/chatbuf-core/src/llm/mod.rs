//! Model completion layer
//!
//! The context buffer decides *what* to send; this module sends it. A
//! [`CompletionProvider`] takes the selected messages plus a model id and
//! returns the reply, either whole or as a stream of text fragments.

pub mod factory;
pub mod messages;
pub mod provider_trait;
pub mod providers;
pub mod streaming;

pub use factory::{ProviderKind, create_provider};
pub use messages::{ChatMessage, MessageRole, parse_conversation, parse_conversation_json};
pub use provider_trait::{CompletionProvider, CompletionRequest};
pub use providers::{EchoProvider, OpenAiProvider};
pub use streaming::{CompletionStream, StreamChunk, stream_utils};
