use serde::Serialize;
use serde::de::DeserializeOwned;
use sled::{Batch, Db};

use crate::persistence::{Storage, StoredRecords};
use crate::utils::error::PersistenceError;

const TOPICS_KEY: &str = "topics";
const SELECTIONS_KEY: &str = "user_selections";
const LAST_ID_KEY: &str = "last_topic_id";

/// Stores each record under its own key in an embedded sled database.
///
/// All keys are replaced in a single `Batch`, which sled applies atomically,
/// and the database is flushed before `save` returns.
#[derive(Clone)]
pub struct SledStorage {
    db: Db,
}

impl SledStorage {
    /// Opens the database at `path`.
    ///
    /// Periodic background flushing is disabled; `save` flushes itself, and
    /// without the flusher thread dropping the last handle releases the
    /// database lock right away so it can be reopened.
    pub fn open(path: &str) -> Result<Self, PersistenceError> {
        let db = sled::Config::new()
            .path(path)
            .flush_every_ms(None)
            .open()?;
        Ok(Self { db })
    }

    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, PersistenceError> {
        match self.db.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_slice(&raw)?)),
            None => Ok(None),
        }
    }

    fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, PersistenceError> {
        Ok(serde_json::to_vec(value)?)
    }
}

impl Storage for SledStorage {
    fn load(&self) -> Result<Option<StoredRecords>, PersistenceError> {
        let topics = self.get(TOPICS_KEY)?;
        let user_selections = self.get(SELECTIONS_KEY)?;
        let last_topic_id = self.get(LAST_ID_KEY)?;

        if topics.is_none() && user_selections.is_none() {
            return Ok(None);
        }
        Ok(Some(StoredRecords {
            topics: topics.unwrap_or_default(),
            user_selections: user_selections.unwrap_or_default(),
            last_topic_id,
        }))
    }

    fn save(&self, records: &StoredRecords) -> Result<(), PersistenceError> {
        let mut batch = Batch::default();
        batch.insert(TOPICS_KEY, Self::encode(&records.topics)?);
        batch.insert(SELECTIONS_KEY, Self::encode(&records.user_selections)?);
        match records.last_topic_id {
            Some(id) => batch.insert(LAST_ID_KEY, Self::encode(&id)?),
            None => batch.remove(LAST_ID_KEY),
        }
        self.db.apply_batch(batch)?;
        self.db.flush()?;
        Ok(())
    }

    fn flush(&self) -> Result<(), PersistenceError> {
        self.db.flush()?;
        Ok(())
    }
}

impl std::fmt::Debug for SledStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SledStorage")
            .field("db", &"sled::Db")
            .finish()
    }
}
