//! # Errstore - Validation Error Storage
//!
//! Append-only persistence for the errors a batch validation run produces.
//!
//! Errstore provides:
//! - Structured error records with entity references and info annotations
//! - Per-dataset table namespaces so many runs can share one database
//! - Sequential error ids that resume correctly across sessions
//! - Batched inserts committed once at the end of a session

pub mod record;
pub mod sequence;
pub mod storage;
pub mod config;
pub mod output;
pub mod ui;

// Re-exports for convenient access
pub use record::{EntityReference, ErrorRecord, InfoEntry};
pub use sequence::ErrorSequence;
pub use storage::{ConnectionSource, DatabaseFile, ErrorStore, StoreOptions, TableMode};

/// Result type alias for Errstore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Errstore operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error ({context}): {source}")]
    Storage {
        context: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Wrap a database failure with the operation that caused it.
    ///
    /// Meant for `map_err`: `conn.execute(..).map_err(Error::storage("create tables"))?`
    pub fn storage(context: impl Into<String>) -> impl FnOnce(rusqlite::Error) -> Error {
        let context = context.into();
        move |source| Error::Storage { context, source }
    }
}
