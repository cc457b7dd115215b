//! Capacity checks consulted before a selection is committed.
//!
//! These are pure functions over a catalog snapshot. They may be called
//! outside the store lock for an early answer, but only the check made inside
//! `TopicStore::toggle` is authoritative.

use crate::store::Catalog;
use crate::store::topic::Topic;
use crate::utils::error::StoreError;

/// Checks whether `user` may add `topic` to their selections.
///
/// The per-user limit is checked first, so a user at the limit sees
/// `LimitExceeded` even when the topic is also full.
pub fn check_select(
    user: &str,
    topic: &Topic,
    state: &Catalog,
    limit: usize,
) -> Result<(), StoreError> {
    if state.selections.of(user).len() >= limit {
        return Err(StoreError::LimitExceeded { limit });
    }
    if state.selections.occupancy(topic.id) >= topic.capacity as usize {
        return Err(StoreError::CapacityFull {
            topic_id: topic.id,
            capacity: topic.capacity,
        });
    }
    Ok(())
}

pub fn can_select(user: &str, topic: &Topic, state: &Catalog, limit: usize) -> bool {
    check_select(user, topic, state, limit).is_ok()
}

pub fn is_full(topic: &Topic, state: &Catalog) -> bool {
    state.selections.occupancy(topic.id) >= topic.capacity as usize
}
