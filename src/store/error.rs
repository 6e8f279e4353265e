//! Error types for the key/value store readers.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The database file is missing or could not be opened.
    #[error("Store unavailable at {path}: {reason}")]
    Unavailable { path: PathBuf, reason: String },

    /// The database opened but lacks the expected table.
    #[error("Table not found: {table}")]
    MissingTable { table: String },

    /// A query against an open database failed.
    #[error("Query failed: {0}")]
    Query(#[from] rusqlite::Error),
}
