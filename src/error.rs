//! Errors reported by table construction and key operations

/// Result alias used throughout the crate
pub type Result<T, E = TableError> = std::result::Result<T, E>;

/// Everything a caller can get wrong when building or using a [`Table`](crate::Table).
///
/// A lookup miss is not an error: `get` reports it as `Ok(None)`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TableError {
    /// The byte-average hash divides by the key length, so keys must be non-empty.
    #[error("Key must not be empty")]
    EmptyKey,

    /// The bucket array is allocated once and never grows.
    #[error("Bucket count must be at least 1")]
    ZeroCapacity,

    #[error("Invalid max load factor, must be within (0, 1]: {0}")]
    InvalidLoadFactor(f64),
}
