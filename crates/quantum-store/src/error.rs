//! # Store Error Types
//!
//! The only genuinely fatal thing a store can hit is a persistence
//! failure. Everything domain-shaped is non-fatal by design:
//! update/delete of a missing id is a no-op, an unmatched QMS join is a
//! reported [`crate::sync::SyncWarning`], and bad numeric input never
//! reaches this layer (it is clamped at the boundary).

use thiserror::Error;

/// Persistence-layer errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The snapshot database rejected an operation.
    #[error("snapshot database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A container failed to round-trip through JSON.
    #[error("snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The data directory could not be created.
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot connection lock was poisoned by a panicking thread.
    #[error("snapshot lock poisoned")]
    Poisoned,
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
