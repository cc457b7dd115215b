//! # TopicSeat
//!
//! `topicseat` lets many users enroll in capacity-limited topics, each user
//! holding at most a fixed number of topics at once, while administrators
//! manage the topic catalog and inspect enrollment.
//!
//! ## Core Modules
//!
//! - `store`: The topic registry, per-user selections, capacity checks and the
//!   serialized `TopicStore` that commits every change.
//! - `persistence`: Durable, all-or-nothing storage of the topic and selection records.
//! - `service`: The request handler transports call, including the admin
//!   add-topic conversation.
//! - `transport`: A WebSocket adapter that speaks JSON to clients.
//! - `config`: Handles loading and managing server configuration.
//! - `utils`: Shared error types and logging setup.

pub mod config;
pub mod persistence;
pub mod service;
pub mod store;
pub mod transport;
pub mod utils;
