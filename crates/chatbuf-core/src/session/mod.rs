//! Chat sessions
//!
//! A [`ChatSession`] is the typed state of one user's chat: the conversation
//! store, the model and budget in use, and the optional follow-up gate. It
//! drives the turn cycle: append the user message, select context, call the
//! provider, append the reply.

pub mod chat_session;
pub mod conversation;
pub mod follow_up;


pub use chat_session::{ChatSession, ReplySource, TurnOutcome};
pub use conversation::Conversation;
pub use follow_up::{FollowUpDecision, FollowUpGate, KIDS_DIRECTIVE};
