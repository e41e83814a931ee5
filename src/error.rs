//! Error types for the `chain-table` crate

use std::collections::TryReserveError;

/// Recoverable failures reported by the `try_*` operations.
///
/// The panicking counterparts (`new`, `set`, `get`) treat the same
/// conditions as fatal.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum TableError {
    /// A table needs at least one bucket.
    #[error("bucket capacity must be at least 1")]
    InvalidCapacity,

    /// A key buffer was shorter than the table's fixed key size.
    #[error("key buffer is {actual} bytes, table expects {expected}")]
    KeySize { expected: usize, actual: usize },

    /// A value buffer was shorter than the table's fixed value size.
    #[error("value buffer is {actual} bytes, table expects {expected}")]
    ValueSize { expected: usize, actual: usize },

    /// Memory for the bucket store or an entry could not be reserved.
    #[error("allocation failed: {0}")]
    Alloc(#[from] TryReserveError),
}
