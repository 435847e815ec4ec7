//! CLI command implementations

pub mod chat;
pub mod select;
pub mod slash;
