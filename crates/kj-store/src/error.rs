//! Error types for the queue table.

use thiserror::Error;

use crate::types::EntryId;

/// Result type alias for queue table operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures of the queue table.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot open queue database: {0}")]
    Open(String),

    #[error("queue transaction failed: {0}")]
    Transaction(String),

    #[error("queue table unavailable: {0}")]
    Table(String),

    #[error("reading the queue failed: {0}")]
    Read(String),

    #[error("writing the queue failed: {0}")]
    Write(String),

    #[error("cannot encode queue row: {0}")]
    Encode(String),

    #[error("corrupt queue row: {0}")]
    Decode(String),

    /// A mutation targeted a row the table does not hold.
    #[error("row {0} is not in the queue")]
    RowNotFound(EntryId),

    /// The physical row order lists an id with no stored row.
    #[error("row order references missing row {0}")]
    DanglingRow(EntryId),
}
