use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde::Serialize;

use crate::persistence::{self, Storage};
use crate::store::guard;
use crate::store::selection::{DEFAULT_SELECTION_LIMIT, MAX_SELECTION_LIMIT, SelectionState};
use crate::store::topic::{Topic, TopicId};
use crate::store::Catalog;
use crate::utils::error::StoreError;

/// Tunables for a `TopicStore`.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub selection_limit: usize,
}

impl StoreOptions {
    /// The configured limit, clamped to `1..=MAX_SELECTION_LIMIT`.
    pub fn effective_selection_limit(&self) -> usize {
        let limit = self.selection_limit.clamp(1, MAX_SELECTION_LIMIT);
        if limit != self.selection_limit {
            tracing::warn!(
                configured = self.selection_limit,
                using = limit,
                "selection limit must be between 1 and {MAX_SELECTION_LIMIT}"
            );
        }
        limit
    }
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            selection_limit: DEFAULT_SELECTION_LIMIT,
        }
    }
}

/// Result of a committed toggle.
#[derive(Debug, Clone, Serialize)]
pub struct ToggleOutcome {
    pub topic: Topic,
    pub state: SelectionState,
    pub occupancy: usize,
    pub selections: Vec<TopicId>,
}

/// A topic as seen by one user.
#[derive(Debug, Clone, Serialize)]
pub struct TopicView {
    pub topic: Topic,
    pub occupancy: usize,
    pub selected: bool,
    pub full: bool,
}

/// The topics a user currently holds, in the order they were chosen.
#[derive(Debug, Clone, Serialize)]
pub struct UserSelections {
    pub topics: Vec<Topic>,
    pub limit: usize,
}

/// Serializes every mutation of the catalog and publishes committed snapshots.
///
/// A mutation takes the writer lock, works on a private copy of the last
/// committed catalog, saves that copy, and only then swaps it in. If the save
/// fails the copy is dropped, so memory never runs ahead of what is on disk.
/// Readers never take the writer lock; they clone the current `Arc<Catalog>`.
pub struct TopicStore {
    storage: Box<dyn Storage>,
    options: StoreOptions,
    writer: Mutex<()>,
    committed: RwLock<Arc<Catalog>>,
}

impl TopicStore {
    /// Loads the stored records and builds a store around them.
    ///
    /// The selection limit is clamped to `1..=MAX_SELECTION_LIMIT`.
    pub fn open(storage: Box<dyn Storage>, options: StoreOptions) -> Self {
        let options = StoreOptions {
            selection_limit: options.effective_selection_limit(),
        };
        let records = persistence::load_or_default(storage.as_ref());
        let catalog = Catalog::from_records(records, options.selection_limit);
        tracing::info!(
            topics = catalog.registry.len(),
            users = catalog.selections.user_count(),
            "topic store opened"
        );
        Self {
            storage,
            options,
            writer: Mutex::new(()),
            committed: RwLock::new(Arc::new(catalog)),
        }
    }

    pub fn selection_limit(&self) -> usize {
        self.options.selection_limit
    }

    /// The last committed catalog.
    pub fn snapshot(&self) -> Arc<Catalog> {
        self.committed
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Runs `f` against a copy of the committed catalog under the writer lock.
    ///
    /// `f` returns its result and whether it changed anything; unchanged
    /// results skip the write.
    pub(crate) fn mutate<T>(
        &self,
        f: impl FnOnce(&mut Catalog) -> Result<(T, bool), StoreError>,
    ) -> Result<T, StoreError> {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        let mut next = Catalog::clone(&self.snapshot());
        let (value, changed) = f(&mut next)?;
        if !changed {
            return Ok(value);
        }

        if let Err(e) = self.storage.save(&next.to_records()) {
            tracing::error!("save failed, discarding uncommitted change: {e}");
            return Err(e.into());
        }

        *self
            .committed
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::new(next);
        Ok(value)
    }

    /// Records `user` with an empty selection set if they are new.
    ///
    /// Returns true when a new entry was created.
    pub fn ensure_user(&self, user: &str) -> Result<bool, StoreError> {
        if self.snapshot().selections.as_map().contains_key(user) {
            return Ok(false);
        }
        let created = self.mutate(|catalog| {
            let created = catalog.selections.ensure_user(user);
            Ok((created, created))
        })?;
        if created {
            tracing::info!(user = %user, "registered new user");
        }
        Ok(created)
    }

    /// Selects `topic_id` for `user`, or deselects it if already selected.
    ///
    /// Deselecting always succeeds. Selecting is refused with
    /// `LimitExceeded` or `CapacityFull` without changing anything.
    pub fn toggle(&self, user: &str, topic_id: TopicId) -> Result<ToggleOutcome, StoreError> {
        let limit = self.options.selection_limit;
        let outcome = self.mutate(|catalog| {
            let topic = catalog.registry.get_topic(topic_id)?.clone();

            let state = if catalog.selections.is_selected(user, topic_id) {
                catalog.selections.deselect(user, topic_id);
                SelectionState::Unselected
            } else {
                guard::check_select(user, &topic, catalog, limit)?;
                catalog.selections.select(user, topic_id);
                SelectionState::Selected
            };

            let outcome = ToggleOutcome {
                occupancy: catalog.selections.occupancy(topic_id),
                selections: catalog.selections.of(user).to_vec(),
                topic,
                state,
            };
            Ok((outcome, true))
        });

        match &outcome {
            Ok(o) => tracing::info!(
                user = %user,
                topic_id,
                state = ?o.state,
                occupancy = o.occupancy,
                "toggle committed"
            ),
            Err(e) => tracing::warn!(user = %user, topic_id, "toggle refused: {e}"),
        }
        outcome
    }

    pub fn get_topic(&self, topic_id: TopicId) -> Result<Topic, StoreError> {
        self.snapshot().registry.get_topic(topic_id).cloned()
    }

    /// All topics in insertion order, from a single snapshot.
    pub fn list_topics(&self) -> Vec<Topic> {
        self.snapshot().registry.topics().to_vec()
    }

    /// All topics with occupancy and `user`'s own selection state.
    pub fn topic_views(&self, user: &str) -> Vec<TopicView> {
        let catalog = self.snapshot();
        catalog
            .registry
            .list_topics()
            .map(|topic| TopicView {
                occupancy: catalog.selections.occupancy(topic.id),
                selected: catalog.selections.is_selected(user, topic.id),
                full: guard::is_full(topic, &catalog),
                topic: topic.clone(),
            })
            .collect()
    }

    pub fn my_selections(&self, user: &str) -> UserSelections {
        let catalog = self.snapshot();
        let topics = catalog
            .selections
            .of(user)
            .iter()
            .filter_map(|id| catalog.registry.get_topic(*id).ok().cloned())
            .collect();
        UserSelections {
            topics,
            limit: self.options.selection_limit,
        }
    }

    /// Pushes any buffered writes to disk. Called on shutdown.
    pub fn flush(&self) -> Result<(), StoreError> {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        self.storage.flush()?;
        Ok(())
    }
}

impl std::fmt::Debug for TopicStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TopicStore")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
