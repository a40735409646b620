//! Error types for oracle card export and import.

use std::path::PathBuf;

use godseed_store::StoreError;

/// Errors raised while building, writing, or reading an oracle card.
#[derive(Debug, thiserror::Error)]
pub enum CardError {
    /// Reading world or actor history from the log store failed.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: StoreError,
    },

    /// A filesystem operation on a card path failed.
    #[error("io error on {path}: {source}")]
    Io {
        /// The path involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// PNG encoding failed.
    #[error("png encode error: {source}")]
    Encode {
        /// The underlying encoder error.
        #[from]
        source: png::EncodingError,
    },

    /// PNG decoding failed.
    #[error("png decode error: {source}")]
    Decode {
        /// The underlying decoder error.
        #[from]
        source: png::DecodingError,
    },

    /// The embedded JSON could not be serialized or parsed.
    #[error("card json error: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// The PNG carries no recognized oracle chunk.
    #[error("{path} contains no oracle data chunk")]
    MissingChunk {
        /// The file that was inspected.
        path: PathBuf,
    },
}
