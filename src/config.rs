//! Construction-time settings for a table.

use crate::error::TableError;

/// Number of buckets a table gets when none is configured.
pub const DEFAULT_CAPACITY: usize = 100;

/// Table configuration. The bucket count is fixed for the table's
/// lifetime; there is no load-factor rehashing.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TableConfig {
    pub capacity: usize,
}

impl TableConfig {
    pub const fn new() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }

    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn validate(&self) -> Result<(), TableError> {
        if self.capacity == 0 {
            return Err(TableError::InvalidCapacity);
        }
        Ok(())
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::new()
    }
}
