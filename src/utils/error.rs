//! The `error` module defines the error types used within the `topicseat` application.
//!
//! Store operations report one of a small, closed set of outcomes. Denials
//! (`NotFound`, `LimitExceeded`, `CapacityFull`, `InvalidInput`) leave state
//! untouched and are rendered directly by the transport; `Persistence` is the
//! only kind a caller is expected to retry.

use thiserror::Error;

use crate::store::TopicId;

/// Failure to read or durably write the selection records.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),
}

/// Errors returned by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("topic {topic_id} not found")]
    NotFound { topic_id: TopicId },

    #[error("selection limit of {limit} reached")]
    LimitExceeded { limit: usize },

    #[error("topic {topic_id} is full ({capacity} seats)")]
    CapacityFull { topic_id: TopicId, capacity: u32 },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("persistence failure: {0}")]
    Persistence(#[from] PersistenceError),
}

impl StoreError {
    /// Stable, machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::NotFound { .. } => "not_found",
            StoreError::LimitExceeded { .. } => "limit_exceeded",
            StoreError::CapacityFull { .. } => "capacity_full",
            StoreError::InvalidInput(_) => "invalid_input",
            StoreError::Persistence(_) => "persistence_failure",
        }
    }

    /// True when the operation failed for a transient reason and may be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Persistence(_))
    }
}

/// Errors surfaced by the request handler.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("admin privileges required")]
    Forbidden,
}

impl ServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Store(e) => e.kind(),
            ServiceError::Forbidden => "forbidden",
        }
    }
}
