use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::utils::error::StoreError;

pub type TopicId = u64;

/// A capacity-limited topic users can enroll in.
///
/// The id is assigned by the `Registry` and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: TopicId,
    pub name: String,
    pub capacity: u32,
}

/// Owns the topic catalog.
///
/// Topics are kept in insertion order. The registry has no locking of its own;
/// callers go through `TopicStore`, which serializes every mutation.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    topics: Vec<Topic>,
    last_id: TopicId,
}

impl Registry {
    /// Rebuilds a registry from persisted topics.
    ///
    /// Topics with a blank name, zero capacity, or an id already seen are
    /// dropped. `last_id` is the persisted high-water mark; it is raised to the
    /// largest id present so a stale or missing mark never causes an id to be
    /// handed out twice.
    pub fn from_parts(topics: Vec<Topic>, last_id: TopicId) -> Self {
        let max = topics.iter().map(|t| t.id).max().unwrap_or(0);
        let mut seen = HashSet::new();
        let topics = topics
            .into_iter()
            .filter(|t| {
                let reason = if t.name.trim().is_empty() {
                    "blank name"
                } else if t.capacity == 0 {
                    "zero capacity"
                } else if !seen.insert(t.id) {
                    "duplicate id"
                } else {
                    return true;
                };
                tracing::warn!(topic_id = t.id, name = %t.name, "dropped stored topic: {reason}");
                false
            })
            .collect();
        Self {
            topics,
            last_id: last_id.max(max),
        }
    }

    /// Adds a topic and returns it.
    ///
    /// The new id is one past the highest id ever assigned, so ids freed by a
    /// delete are not reused.
    pub fn add_topic(&mut self, name: &str, capacity: u32) -> Result<Topic, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidInput("topic name is empty".into()));
        }
        if capacity == 0 {
            return Err(StoreError::InvalidInput(
                "capacity must be greater than zero".into(),
            ));
        }

        self.last_id += 1;
        let topic = Topic {
            id: self.last_id,
            name: name.to_string(),
            capacity,
        };
        self.topics.push(topic.clone());
        Ok(topic)
    }

    /// Removes a topic, returning it if it existed.
    ///
    /// Selections referring to the topic are not touched here.
    pub fn delete_topic(&mut self, id: TopicId) -> Option<Topic> {
        let pos = self.topics.iter().position(|t| t.id == id)?;
        Some(self.topics.remove(pos))
    }

    pub fn get_topic(&self, id: TopicId) -> Result<&Topic, StoreError> {
        self.topics
            .iter()
            .find(|t| t.id == id)
            .ok_or(StoreError::NotFound { topic_id: id })
    }

    pub fn contains(&self, id: TopicId) -> bool {
        self.topics.iter().any(|t| t.id == id)
    }

    pub fn list_topics(&self) -> impl Iterator<Item = &Topic> {
        self.topics.iter()
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn last_id(&self) -> TopicId {
        self.last_id
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}
