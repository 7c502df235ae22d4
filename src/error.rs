//! Error types for chunking operations.

use thiserror::Error;

/// Errors that abort a chunking run.
///
/// Recoverable conditions (unresolved cross-references, unrecognized content,
/// a page that fails to assemble) are logged and counted in the
/// [`ChunkReport`](crate::ChunkReport) instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Invalid depth specifier: {0}")]
    InvalidDepth(String),

    #[error("Invalid selector: {0}")]
    Selector(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
