use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use serde::Serialize;

use crate::store::UserId;

/// Where a user is in a multi-step exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    #[default]
    Idle,
    /// The next text message is an add-topic payload.
    AwaitingTopicPayload,
}

/// Conversation state keyed by user id. Users not present are `Idle`.
#[derive(Debug, Default)]
pub struct Conversations {
    states: Mutex<HashMap<UserId, ConversationState>>,
}

impl Conversations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, user: &str) -> ConversationState {
        self.states
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(user)
            .copied()
            .unwrap_or_default()
    }

    pub fn set(&self, user: &str, state: ConversationState) {
        let mut states = self.states.lock().unwrap_or_else(PoisonError::into_inner);
        match state {
            ConversationState::Idle => {
                states.remove(user);
            }
            other => {
                states.insert(user.to_string(), other);
            }
        }
    }

    pub fn reset(&self, user: &str) {
        self.set(user, ConversationState::Idle);
    }
}
