//! Conversation context buffering
//!
//! Before every model call the chat loop hands the full conversation to a
//! [`ContextBuffer`], which returns the part that fits the configured
//! [`Budget`]:
//!
//! - the leading system directive, always;
//! - the most recent exchanges (count budget), or the most recent messages
//!   whose estimated size fits the remaining token ceiling (token budget).
//!
//! Selection is pure and idempotent. The caller owns the conversation and
//! appends to it; this module only ever derives a view.
//!
//! # Example
//!
//! ```rust
//! use chatbuf_core::context::{Budget, ContextBuffer};
//! use chatbuf_core::llm::ChatMessage;
//!
//! let conversation = vec![
//!     ChatMessage::system("Answer like a pirate."),
//!     ChatMessage::user("Hi"),
//!     ChatMessage::assistant("Ahoy!"),
//!     ChatMessage::user("Where is the treasure?"),
//! ];
//!
//! let buffer = ContextBuffer::new(Budget::exchanges(1));
//! let selected = buffer.select(&conversation);
//! assert_eq!(selected.len(), 2);
//! assert!(selected[0].is_system());
//! ```

pub mod budget;
pub mod buffer;
pub mod estimator;


pub use budget::Budget;
pub use buffer::{BufferSelection, BufferStats, ContextBuffer, select, split_directive};
pub use estimator::TokenEstimator;
