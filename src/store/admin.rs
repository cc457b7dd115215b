//! Catalog changes made by administrators.
//!
//! These run through the same writer lock as `toggle`, so a delete can never
//! interleave with a selection of the topic being deleted.

use crate::store::TopicStore;
use crate::store::topic::{Topic, TopicId};
use crate::utils::error::StoreError;

/// Parses an add-topic payload of the form `"name | capacity"`.
pub fn parse_topic_payload(text: &str) -> Result<(String, u32), StoreError> {
    let mut parts = text.split('|');
    let (Some(name), Some(capacity), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(StoreError::InvalidInput(
            "expected \"name | capacity\"".into(),
        ));
    };

    let name = name.trim();
    if name.is_empty() {
        return Err(StoreError::InvalidInput("topic name is empty".into()));
    }

    let capacity: i64 = capacity
        .trim()
        .parse()
        .map_err(|_| StoreError::InvalidInput("capacity must be a number".into()))?;
    if capacity <= 0 {
        return Err(StoreError::InvalidInput(
            "capacity must be greater than zero".into(),
        ));
    }
    let capacity = u32::try_from(capacity)
        .map_err(|_| StoreError::InvalidInput("capacity is too large".into()))?;

    Ok((name.to_string(), capacity))
}

impl TopicStore {
    pub fn add_topic(&self, name: &str, capacity: u32) -> Result<Topic, StoreError> {
        let topic = self.mutate(|catalog| Ok((catalog.registry.add_topic(name, capacity)?, true)))?;
        tracing::info!(
            topic_id = topic.id,
            name = %topic.name,
            capacity = topic.capacity,
            "topic added"
        );
        Ok(topic)
    }

    /// Deletes a topic and removes it from every user's selections in one commit.
    pub fn delete_topic(&self, topic_id: TopicId) -> Result<Topic, StoreError> {
        let (topic, released) = self.mutate(|catalog| {
            let topic = catalog
                .registry
                .delete_topic(topic_id)
                .ok_or(StoreError::NotFound { topic_id })?;
            let released = catalog.selections.remove_topic(topic_id);
            Ok(((topic, released), true))
        })?;
        tracing::info!(topic_id, released, "topic deleted");
        Ok(topic)
    }
}
