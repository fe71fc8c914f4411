//! Error types for the export.

use m3ter_client::ClientError;
use m3ter_store::StoreError;

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Errors that can end an export run.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The billing API call failed.
    #[error("billing API error: {0}")]
    Client(#[from] ClientError),

    /// Reading the mapping tables failed.
    #[error("mapping store error: {0}")]
    Store(#[from] StoreError),

    /// A record did not have the shape the report needs.
    #[error("malformed record {record}: {reason}")]
    DataShape {
        /// Which record, e.g. `bill b-1 line item li-2`.
        record: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Writing CSV failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Export settings are missing or invalid.
    #[error("configuration error: {0}")]
    Configuration(String),
}
