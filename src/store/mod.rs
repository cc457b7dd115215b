//! The `store` module holds the topic catalog, every user's selections, and
//! the rules that keep them consistent.
//!
//! `TopicStore` is the only way to change state. It runs each mutation under
//! one lock, checks capacity inside that lock, writes the result durably and
//! only then publishes it to readers.

pub mod admin;
pub mod engine;
pub mod guard;
pub mod selection;
pub mod stats;
pub mod topic;

use std::collections::HashSet;

use crate::persistence::StoredRecords;

pub use engine::{StoreOptions, TopicStore};
pub use selection::{SelectionState, Selections, UserId};
pub use topic::{Registry, Topic, TopicId};

/// A complete, consistent view of the store at one commit.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub registry: Registry,
    pub selections: Selections,
}

impl Catalog {
    /// Builds a catalog from stored records, repairing anything that breaks
    /// the store's invariants.
    ///
    /// Selections of unknown topics and duplicate entries are dropped, users
    /// holding more than `limit` topics keep only the first `limit`, and a
    /// topic held by more users than its capacity keeps the first `capacity`
    /// holders by user id.
    pub fn from_records(records: StoredRecords, limit: usize) -> Self {
        let registry = Registry::from_parts(records.topics, records.last_topic_id.unwrap_or(0));
        let mut selections = Selections::from_map(records.user_selections);

        for (user, topics) in selections.as_map_mut().iter_mut() {
            let before = topics.len();
            let mut seen = HashSet::new();
            topics.retain(|id| registry.contains(*id) && seen.insert(*id));
            if topics.len() > limit {
                topics.truncate(limit);
            }
            if topics.len() != before {
                tracing::warn!(
                    user = %user,
                    dropped = before - topics.len(),
                    "repaired stored selections"
                );
            }
        }

        // Holders beyond a topic's capacity lose it, in user id order.
        for topic in registry.list_topics() {
            let holders = selections.users_of(topic.id);
            for user in holders.iter().skip(topic.capacity as usize) {
                selections.deselect(user, topic.id);
                tracing::warn!(
                    user = %user,
                    topic_id = topic.id,
                    capacity = topic.capacity,
                    "dropped stored selection above topic capacity"
                );
            }
        }

        Self {
            registry,
            selections,
        }
    }

    pub fn to_records(&self) -> StoredRecords {
        StoredRecords {
            topics: self.registry.topics().to_vec(),
            user_selections: self.selections.as_map().clone(),
            last_topic_id: Some(self.registry.last_id()),
        }
    }
}
