//! Error types for the heap dump and CLI surfaces.
//!
//! The allocation context types have no errors: misuse is a caller bug caught
//! by debug assertions. Everything that touches files uses `thiserror` here,
//! and the binary propagates with `anyhow`.

use thiserror::Error;

/// Errors that can occur while writing or reading heap dump files
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to read file: {0}")]
    ReadFailed(std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),

    #[error("Unsupported heap dump version: {0}")]
    UnsupportedVersion(String),
}
