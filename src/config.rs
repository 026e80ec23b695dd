//! Construction parameters and fixed tuning constants

use std::num::NonZeroUsize;

use crate::error::{Result, TableError};

/// Default number of buckets (2 MiB worth of slots).
pub const DEFAULT_BUCKET_COUNT: usize = 1024 * 1024 * 2;

/// Default maximum load factor. Recorded on the table, never consulted.
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.75;

/// Number of quadratic probing rounds before a key falls back to chaining.
pub const ROUND_LIMIT: u32 = 5;

/// Parameters fixed for the whole lifetime of a table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableConfig {
    /// Length of the bucket array
    pub bucket_count: usize,
    /// Load factor kept for callers that want to build resizing on top
    pub max_load_factor: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self { bucket_count: DEFAULT_BUCKET_COUNT, max_load_factor: DEFAULT_MAX_LOAD_FACTOR }
    }
}

impl TableConfig {
    /// Replaces the bucket count
    #[must_use]
    pub fn with_bucket_count(mut self, bucket_count: usize) -> Self {
        self.bucket_count = bucket_count;
        self
    }

    /// Replaces the max load factor
    #[must_use]
    pub fn with_max_load_factor(mut self, max_load_factor: f64) -> Self {
        self.max_load_factor = max_load_factor;
        self
    }

    /// Checks the parameters and returns the bucket count as a non-zero value.
    ///
    /// # Errors
    ///
    /// [`TableError::ZeroCapacity`] for an empty bucket array and
    /// [`TableError::InvalidLoadFactor`] when the load factor is not a finite value in `(0, 1]`.
    pub fn validate(&self) -> Result<NonZeroUsize> {
        let bucket_count = NonZeroUsize::new(self.bucket_count).ok_or(TableError::ZeroCapacity)?;

        if !self.max_load_factor.is_finite() ||
            self.max_load_factor <= 0.0 ||
            self.max_load_factor > 1.0
        {
            return Err(TableError::InvalidLoadFactor(self.max_load_factor));
        }

        Ok(bucket_count)
    }
}
