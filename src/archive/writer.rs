use crate::archive::codec::write_u32;
use crate::archive::format::{HeaderRecord, DEFAULT_CHUNK_SIZE, HEADER_END, REVISION};
use crate::archive::stream::copy_chunked;
use crate::error::{BpkgError, Result};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Archive generator packing a source directory into a single BPKG file.
///
/// Generation runs in two build phases plus a merge: the binary section is
/// streamed into a temporary file while offsets accumulate, the header
/// section is written from the recorded entries, and both temporaries are
/// concatenated into the final archive. Every copy step moves at most one
/// chunk, so peak memory is bounded regardless of input size.
pub struct ArchiveWriter {
    version: u32,
    chunk_size: usize,
}

impl ArchiveWriter {
    pub fn new() -> Self {
        Self {
            version: REVISION,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Override the version tag stamped into the archive.
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Override the streaming chunk size in bytes. Must be non-zero.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Pack every regular file of `source` into the archive at `output`.
    ///
    /// Entries are taken in filesystem enumeration order. Source files that
    /// cannot be opened are logged and skipped; paths containing a reserved
    /// terminator byte fail the whole generation.
    pub fn generate<P: AsRef<Path>, Q: AsRef<Path>>(&self, source: P, output: Q) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(BpkgError::InvalidConfig(
                "Chunk size must be greater than zero".to_string(),
            ));
        }

        let output = output.as_ref();
        let bin_path = temp_path(output, ".bin");
        let header_path = temp_path(output, ".header");

        let entries = self.write_binary_section(source.as_ref(), &bin_path)?;
        self.write_header_section(&entries, &header_path)?;
        self.merge(&header_path, &bin_path, output)?;

        fs::remove_file(&bin_path)?;
        fs::remove_file(&header_path)?;
        Ok(())
    }

    // Phase 1: stream each readable regular file into the temporary binary
    // file, recording its logical path, running offset, and size.
    fn write_binary_section(&self, source: &Path, bin_path: &Path) -> Result<Vec<HeaderRecord>> {
        let mut bin_out = BufWriter::new(File::create(bin_path)?);
        let mut entries: Vec<HeaderRecord> = Vec::new();
        let mut total: u64 = 0;

        for dir_entry in fs::read_dir(source)? {
            let dir_entry = dir_entry?;
            let path = dir_entry.path();

            // The in-progress temporary binary file must not pack itself.
            if path == bin_path {
                continue;
            }
            match dir_entry.file_type() {
                Ok(kind) if kind.is_file() => {}
                Ok(_) => continue,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "Skipping unreadable directory entry");
                    continue;
                }
            }

            let Some(logical) = path.to_str() else {
                warn!(path = %path.display(), "Skipping file with a non-UTF-8 path");
                continue;
            };
            HeaderRecord::validate_path(logical)?;

            let mut file = match File::open(&path) {
                Ok(file) => file,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "Failed to open source file, skipping");
                    continue;
                }
            };

            let size = copy_chunked(&mut file, &mut bin_out, self.chunk_size)?;
            entries.push(HeaderRecord::new(logical.to_string(), total, size));
            total += size;
        }

        bin_out.flush()?;
        Ok(entries)
    }

    // Phase 2: version field, one skewed record per entry, then the header
    // terminator.
    fn write_header_section(&self, entries: &[HeaderRecord], header_path: &Path) -> Result<()> {
        let mut header_out = BufWriter::new(File::create(header_path)?);

        write_u32(&mut header_out, self.version)?;
        for (ordinal, record) in entries.iter().enumerate() {
            record.write_to(&mut header_out, ordinal as u64)?;
        }
        header_out.write_all(&[HEADER_END])?;
        header_out.flush()?;
        Ok(())
    }

    // Phase 3: concatenate header and binary temporaries into the output.
    fn merge(&self, header_path: &Path, bin_path: &Path, output: &Path) -> Result<()> {
        let mut out = BufWriter::new(File::create(output)?);

        let mut header_in = File::open(header_path)?;
        copy_chunked(&mut header_in, &mut out, self.chunk_size)?;

        let mut bin_in = File::open(bin_path)?;
        copy_chunked(&mut bin_in, &mut out, self.chunk_size)?;

        out.flush()?;
        Ok(())
    }
}

impl Default for ArchiveWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Pack `source` into `output` with the default version and chunk size.
pub fn generate<P: AsRef<Path>, Q: AsRef<Path>>(source: P, output: Q) -> Result<()> {
    ArchiveWriter::new().generate(source, output)
}

/// `output` with `suffix` appended, e.g. `pack.bpkg` into `pack.bpkg.bin`.
fn temp_path(output: &Path, suffix: &str) -> PathBuf {
    let mut os: OsString = output.as_os_str().to_os_string();
    os.push(suffix);
    PathBuf::from(os)
}
