use thiserror::Error;

/// Failures a storage backend can report to the registry.
///
/// Absence is not an error at this layer: lookups return `Option`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    /// Stored bytes or cross-table references that no valid commit produces.
    #[error("database is corrupted: {0}")]
    Corruption(String),
}
