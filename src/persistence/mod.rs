//! The `persistence` module provides durable storage for the topic catalog and
//! the per-user selections.
//!
//! Both records are always written together as one complete replacement, so a
//! crash mid-write leaves either the previous or the new state on disk, never
//! a mix. Two backends are available: a JSON document replaced through a
//! staging file and `rename`, and an embedded `sled` database written with a
//! single atomic batch. The admin record is a separate, read-only JSON file.

pub mod admins;
pub mod json_store;
pub mod sled_store;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::store::{TopicId, UserId, topic::Topic};
use crate::utils::error::PersistenceError;

pub use json_store::JsonFileStorage;
pub use sled_store::SledStorage;

/// Logical shape of the persisted state.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct StoredRecords {
    #[serde(default)]
    pub topics: Vec<Topic>,
    #[serde(default)]
    pub user_selections: BTreeMap<UserId, Vec<TopicId>>,
    /// Highest topic id ever assigned. Older documents omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_topic_id: Option<TopicId>,
}

/// A durable home for `StoredRecords`.
///
/// `save` must replace both records atomically and return only once the
/// write is durable; it is called while the store's mutation lock is held.
pub trait Storage: Send + Sync {
    /// Returns `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<StoredRecords>, PersistenceError>;

    fn save(&self, records: &StoredRecords) -> Result<(), PersistenceError>;

    fn flush(&self) -> Result<(), PersistenceError> {
        Ok(())
    }
}

/// Loads the stored records, starting fresh when there are none or they
/// cannot be read.
pub fn load_or_default(storage: &dyn Storage) -> StoredRecords {
    match storage.load() {
        Ok(Some(records)) => records,
        Ok(None) => {
            tracing::info!("no stored records found, starting with an empty catalog");
            StoredRecords::default()
        }
        Err(e) => {
            tracing::warn!("stored records unreadable ({e}), starting with an empty catalog");
            StoredRecords::default()
        }
    }
}
