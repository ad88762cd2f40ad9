use std::io;
use thiserror::Error;

/// Result type for BPKG operations
pub type Result<T> = std::result::Result<T, BpkgError>;

/// Unified error type for all BPKG operations
///
/// A missing resource during [`load`](crate::ArchiveReader::load) is not an
/// error: it is reported as `Ok(None)` so callers can recover locally.
#[derive(Debug, Error)]
pub enum BpkgError {
    #[error("Archive not found: {0}")]
    ArchiveNotFound(String),

    #[error("Corrupt archive: {0}")]
    CorruptArchive(String),

    #[error("Invalid path: {0}")]
    PathError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
