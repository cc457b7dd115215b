use std::sync::Arc;

use serde::Serialize;

use crate::store::selection::UserId;
use crate::store::topic::{Topic, TopicId};
use crate::store::{Catalog, TopicStore};
use crate::utils::error::StoreError;

/// Occupancy of one topic.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TopicStats {
    pub topic: Topic,
    pub occupancy: usize,
}

/// Summary of the whole catalog.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Stats {
    pub total_topics: usize,
    pub total_users: usize,
    pub topics: Vec<TopicStats>,
}

/// Read-only reporting over one committed snapshot.
///
/// Every query on a view answers from the same commit, however long the
/// caller holds on to it.
#[derive(Debug, Clone)]
pub struct StatisticsView {
    catalog: Arc<Catalog>,
}

impl StatisticsView {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn occupancy(&self, topic_id: TopicId) -> Result<usize, StoreError> {
        self.catalog.registry.get_topic(topic_id)?;
        Ok(self.catalog.selections.occupancy(topic_id))
    }

    pub fn total_topics(&self) -> usize {
        self.catalog.registry.len()
    }

    pub fn total_users(&self) -> usize {
        self.catalog.selections.user_count()
    }

    pub fn users_of(&self, topic_id: TopicId) -> Result<Vec<UserId>, StoreError> {
        self.catalog.registry.get_topic(topic_id)?;
        Ok(self.catalog.selections.users_of(topic_id))
    }

    pub fn topic(&self, topic_id: TopicId) -> Result<&Topic, StoreError> {
        self.catalog.registry.get_topic(topic_id)
    }

    pub fn stats(&self) -> Stats {
        let topics = self
            .catalog
            .registry
            .list_topics()
            .map(|topic| TopicStats {
                topic: topic.clone(),
                occupancy: self.catalog.selections.occupancy(topic.id),
            })
            .collect();
        Stats {
            total_topics: self.total_topics(),
            total_users: self.total_users(),
            topics,
        }
    }
}

impl TopicStore {
    pub fn statistics(&self) -> StatisticsView {
        StatisticsView::new(self.snapshot())
    }
}
