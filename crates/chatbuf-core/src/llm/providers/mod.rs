//! Completion provider implementations

mod echo;
mod openai;
mod openai_stream;

pub use echo::EchoProvider;
pub use openai::OpenAiProvider;
pub use openai_stream::openai_sse_stream;
