//! Error types for chatbuf
//!
//! Every fallible operation in the core library returns [`ChatResult`].
//! Selection itself only fails on malformed input; everything else here
//! belongs to the collaborators around it (providers, configuration, I/O).

mod constructors;
mod conversions;
mod types;

pub use types::{ChatError, ChatResult};
