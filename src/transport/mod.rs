//! The `transport` module is a thin WebSocket adapter in front of the
//! request handler.
//!
//! It defines the JSON frames exchanged with clients, identifies each
//! connection's user, and forwards their actions to `service::Handler`.
//! Rendering replies into buttons or text is left to the client.

pub mod message;
pub mod websocket;
