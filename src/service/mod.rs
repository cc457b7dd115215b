//! The `service` module is the request-handling boundary of the application.
//!
//! A transport turns whatever its users do into an `Action`, calls
//! `Handler::handle`, and renders the structured `Reply` it gets back. The
//! handler knows nothing about sockets or message formatting.

pub mod conversation;
pub mod directory;
pub mod handler;

pub use conversation::{ConversationState, Conversations};
pub use directory::{AdminSet, MemoryDirectory, NoDirectory, UserDirectory, display_label};
pub use handler::{Action, Handler, Reply, UserEntry};

#[cfg(test)]
mod tests;
