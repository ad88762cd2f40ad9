//! bpkg-rs: single-file BPKG archives with indexed random access
//!
//! This library implements the BPKG container format:
//! - A generator that packs a source directory's files into one archive
//! - A reader that indexes the archive header and lazily loads blobs on
//!   demand, caching them until evicted
//! - Chunked streaming I/O that bounds memory use independent of file size
//!
//! # Example
//!
//! ```no_run
//! use bpkg_rs::{ArchiveReader, ArchiveWriter};
//!
//! // Pack a directory into an archive
//! ArchiveWriter::new().generate("assets", "assets.bpkg")?;
//!
//! // Read a blob back by its logical path
//! let mut reader = ArchiveReader::open("assets.bpkg")?;
//! if let Some(bytes) = reader.load("assets/logo.png")? {
//!     println!("{} bytes", bytes.len());
//! }
//! # Ok::<(), bpkg_rs::error::BpkgError>(())
//! ```

// Core modules
pub mod archive;
pub mod error;

// Re-export commonly used types
pub use archive::{
    generate, signature_valid, ArchiveReader, ArchiveWriter, HeaderEntry, HeaderRecord,
    DEFAULT_CHUNK_SIZE, HEADER_END, PATH_END, REVISION, REVISION_SIGNATURE,
};
pub use error::{BpkgError, Result};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Ensure core types are accessible
        let _writer = ArchiveWriter::new();
        assert!(signature_valid(REVISION));
    }
}
