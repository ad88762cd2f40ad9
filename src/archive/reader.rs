use crate::archive::codec::{read_u32, read_u64};
use crate::archive::format::{
    self, HeaderEntry, HeaderRecord, HEADER_END, INDEX_SIZE, PATH_END, VERSION_SIZE,
};
use crate::error::{BpkgError, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Archive reader with O(1) entry lookup and a lazy blob cache.
///
/// The header index is built once at open time and is immutable afterwards.
/// Blobs are read from disk on first [`load`](Self::load) and kept in the
/// cache until [`unload`](Self::unload) or [`clear`](Self::clear).
pub struct ArchiveReader {
    archive_path: PathBuf,
    version: u32,
    bin_start: u64,
    entries: HashMap<String, HeaderEntry>,
    entry_list: Vec<String>,
    objects: HashMap<String, Vec<u8>>,
}

impl ArchiveReader {
    /// Open an archive file and build its header index.
    ///
    /// Fails with [`BpkgError::ArchiveNotFound`] when the file does not
    /// exist and [`BpkgError::CorruptArchive`] when the header section ends
    /// before its terminator byte.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let archive_path = path.as_ref().to_path_buf();
        let file = File::open(&archive_path).map_err(|err| not_found(err, &archive_path))?;
        let mut reader = BufReader::new(file);

        let version = read_u32(&mut reader)
            .map_err(|err| corrupt_on_eof(err, "version field"))?;
        let scan = scan_header(&mut reader)?;

        Ok(Self {
            archive_path,
            version,
            bin_start: scan.bin_start,
            entries: scan.entries,
            entry_list: scan.entry_list,
            objects: HashMap::new(),
        })
    }

    /// Load a blob by its logical path, reading from disk on first access.
    ///
    /// Returns `Ok(None)` when the path is absent from the header index. The
    /// returned slice borrows this reader, so the borrow must end before any
    /// call to [`unload`](Self::unload) or [`clear`](Self::clear).
    pub fn load(&mut self, path: &str) -> Result<Option<&[u8]>> {
        if !self.objects.contains_key(path) {
            let Some(entry) = self.entries.get(path).copied() else {
                return Ok(None);
            };
            let data = self.read_blob(&entry)?;
            self.objects.insert(path.to_string(), data);
        }
        Ok(self.objects.get(path).map(|data| data.as_slice()))
    }

    /// Evict the cached buffer for `path`. No-op when nothing is cached.
    pub fn unload(&mut self, path: &str) {
        self.objects.remove(path);
    }

    /// Evict every cached buffer.
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Version tag read from the archive.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Whether the version tag carries the stock generator brand.
    pub fn signature_valid(&self) -> bool {
        format::signature_valid(self.version)
    }

    /// File offset where the binary section begins.
    pub fn bin_start(&self) -> u64 {
        self.bin_start
    }

    /// Number of entries in the archive.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Check if a logical path exists in the archive.
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Get entry information without reading blob data.
    pub fn get_entry(&self, path: &str) -> Option<&HeaderEntry> {
        self.entries.get(path)
    }

    /// Logical paths in the order their header records were scanned.
    pub fn list_paths(&self) -> &[String] {
        &self.entry_list
    }

    /// Whether a blob is currently held in the cache.
    pub fn is_loaded(&self, path: &str) -> bool {
        self.objects.contains_key(path)
    }

    // Each load opens a fresh handle, so independent readers and processes
    // never share file-position state on the same archive.
    fn read_blob(&self, entry: &HeaderEntry) -> Result<Vec<u8>> {
        let mut file =
            File::open(&self.archive_path).map_err(|err| not_found(err, &self.archive_path))?;
        file.seek(SeekFrom::Start(self.bin_start + entry.offset))?;

        let mut data = vec![0u8; entry.size as usize];
        file.read_exact(&mut data).map_err(|err| {
            if err.kind() == ErrorKind::UnexpectedEof {
                BpkgError::CorruptArchive(format!(
                    "Blob at offset {} with size {} extends past the end of the archive",
                    entry.offset, entry.size
                ))
            } else {
                BpkgError::Io(err)
            }
        })?;
        Ok(data)
    }
}

struct HeaderScan {
    entries: HashMap<String, HeaderEntry>,
    entry_list: Vec<String>,
    bin_start: u64,
}

/// Scan the header section one byte at a time.
///
/// Two states: accumulating path bytes, and (on a path terminator) reading
/// the record's offset/size pair. The scan succeeds only when the header
/// terminator is seen; running out of input first is a corrupt archive.
fn scan_header<R: Read>(reader: &mut R) -> Result<HeaderScan> {
    let mut entries = HashMap::new();
    let mut entry_list: Vec<String> = Vec::new();
    let mut path_buf: Vec<u8> = Vec::new();
    let mut pos = VERSION_SIZE as u64;

    loop {
        let Some(byte) = read_byte(reader)? else {
            return Err(BpkgError::CorruptArchive(
                "End of input reached before the header terminator".to_string(),
            ));
        };
        pos += 1;

        match byte {
            HEADER_END => {
                return Ok(HeaderScan {
                    entries,
                    entry_list,
                    bin_start: pos,
                })
            }
            PATH_END => {
                let stored_offset = read_u64(&mut *reader)
                    .map_err(|err| corrupt_on_eof(err, "header record offset"))?;
                let stored_size = read_u64(&mut *reader)
                    .map_err(|err| corrupt_on_eof(err, "header record size"))?;
                pos += 2 * INDEX_SIZE as u64;

                let ordinal = entry_list.len() as u64;
                let entry = HeaderRecord::unskew(stored_offset, stored_size, ordinal)?;

                let path = String::from_utf8(std::mem::take(&mut path_buf)).map_err(|err| {
                    BpkgError::PathError(format!("Entry path is not valid UTF-8: {err}"))
                })?;

                // Duplicate paths are not produced by the generator; last
                // record wins without a second entry_list slot.
                if entries.insert(path.clone(), entry).is_none() {
                    entry_list.push(path);
                }
            }
            other => path_buf.push(other),
        }
    }
}

fn read_byte<R: Read>(reader: &mut R) -> Result<Option<u8>> {
    let mut buf = [0u8; 1];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        }
    }
}

fn not_found(err: std::io::Error, path: &Path) -> BpkgError {
    if err.kind() == ErrorKind::NotFound {
        BpkgError::ArchiveNotFound(path.display().to_string())
    } else {
        BpkgError::Io(err)
    }
}

fn corrupt_on_eof(err: BpkgError, what: &str) -> BpkgError {
    match err {
        BpkgError::Io(io_err) if io_err.kind() == ErrorKind::UnexpectedEof => {
            BpkgError::CorruptArchive(format!("End of input while reading {what}"))
        }
        other => other,
    }
}
