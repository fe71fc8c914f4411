//! Error types for the mapping store.

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while reading mapping tables.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Connecting to or querying the database failed.
    #[error("database error: {0}")]
    Database(String),

    /// Connection settings are missing or invalid.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}
