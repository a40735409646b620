//! Error types for the log store.

use std::path::PathBuf;

/// Errors raised by the append-only log store.
///
/// Read-side problems (missing files, corrupt lines) are deliberately not
/// represented here: they degrade to absent history with a warning. These
/// variants cover the failures that must be surfaced.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The data directory could not be created.
    #[error("failed to create data dir {path}: {source}")]
    CreateDir {
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The data directory could not be enumerated for discovery.
    #[error("failed to list entity logs in {path}: {source}")]
    Discover {
        /// The directory that could not be listed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A record could not be serialized.
    #[error("failed to encode log record: {source}")]
    Serialize {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// A record could not be appended to an entity's log file.
    #[error("failed to append to log of {entity}: {source}")]
    Write {
        /// The entity whose log could not be written.
        entity: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// An entity name reduced to an empty filename after sanitizing.
    #[error("invalid entity name: {0:?}")]
    InvalidName(String),
}
