//! Core error type for chatbuf

use thiserror::Error;

/// Result type alias for chatbuf operations
pub type ChatResult<T> = Result<T, ChatError>;

/// Main error type for chatbuf
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChatError {
    /// A message in a caller-supplied conversation is missing a field or
    /// carries an unknown role. This is a caller bug and is never retried.
    #[error("Malformed message at index {index}: {reason}")]
    MalformedMessage { index: usize, reason: String },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// Completion provider errors
    #[error("LLM error: {message}")]
    Llm {
        message: String,
        provider: Option<String>,
        status_code: Option<u16>,
    },

    /// HTTP transport errors
    #[error("HTTP error: {message}")]
    Http {
        message: String,
        url: Option<String>,
        status_code: Option<u16>,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json { message: String },

    /// IO errors
    #[error("IO error: {message}")]
    Io { message: String },

    /// Invalid input errors
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        field: Option<String>,
    },

    /// Generic error
    #[error("Error: {message}")]
    Other { message: String },
}

impl ChatError {
    /// Short machine-readable code for the error kind
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedMessage { .. } => "CHAT_MALFORMED_MESSAGE",
            Self::Config { .. } => "CHAT_CONFIG",
            Self::Llm { .. } => "CHAT_LLM",
            Self::Http { .. } => "CHAT_HTTP",
            Self::Json { .. } => "CHAT_JSON",
            Self::Io { .. } => "CHAT_IO",
            Self::InvalidInput { .. } => "CHAT_INVALID_INPUT",
            Self::Other { .. } => "CHAT_OTHER",
        }
    }

    /// Whether retrying the same request could succeed
    ///
    /// Only transport-level failures and server-side statuses qualify.
    /// Authentication and client errors (4xx other than 429) never do.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { status_code, .. } | Self::Llm { status_code, .. } => match status_code {
                Some(429) => true,
                Some(code) => *code >= 500,
                None => matches!(self, Self::Http { .. }),
            },
            _ => false,
        }
    }
}
