use super::error::{PersistenceError, ServiceError, StoreError};
use super::logging;

#[test]
fn test_logging_init_accepts_levels() {
    // Should not panic
    logging::init("info");
    logging::init("debug");
    logging::init("bogus");
}

#[test]
fn test_only_persistence_errors_are_retryable() {
    let io = std::io::Error::other("disk full");
    assert!(StoreError::from(PersistenceError::from(io)).is_retryable());
    assert!(!StoreError::NotFound { topic_id: 1 }.is_retryable());
    assert!(!StoreError::LimitExceeded { limit: 2 }.is_retryable());
    assert!(
        !StoreError::CapacityFull {
            topic_id: 1,
            capacity: 3
        }
        .is_retryable()
    );
    assert!(!StoreError::InvalidInput("empty name".into()).is_retryable());
}

#[test]
fn test_error_kinds() {
    assert_eq!(StoreError::NotFound { topic_id: 7 }.kind(), "not_found");
    assert_eq!(StoreError::LimitExceeded { limit: 2 }.kind(), "limit_exceeded");
    assert_eq!(ServiceError::Forbidden.kind(), "forbidden");
    let wrapped = ServiceError::from(StoreError::InvalidInput("x".into()));
    assert_eq!(wrapped.kind(), "invalid_input");
    assert_eq!(wrapped.to_string(), "invalid input: x");
}
