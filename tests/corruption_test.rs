//! Corruption and failure-path tests for the archive reader.

use bpkg_rs::{ArchiveReader, ArchiveWriter, BpkgError, REVISION};
use std::fs;
use tempfile::TempDir;

fn write_archive(dir: &TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, bytes).unwrap();
    path
}

fn record(path: &str, stored_offset: u64, stored_size: u64) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(path.as_bytes());
    bytes.push(0x19);
    bytes.extend_from_slice(&stored_offset.to_be_bytes());
    bytes.extend_from_slice(&stored_size.to_be_bytes());
    bytes
}

#[test]
fn test_missing_archive_file() {
    let dir = TempDir::new().unwrap();
    let result = ArchiveReader::open(dir.path().join("nowhere.bpkg"));
    assert!(matches!(result, Err(BpkgError::ArchiveNotFound(_))));
}

#[test]
fn test_empty_file_is_corrupt() {
    let dir = TempDir::new().unwrap();
    let path = write_archive(&dir, "empty", &[]);
    let result = ArchiveReader::open(&path);
    assert!(matches!(result, Err(BpkgError::CorruptArchive(_))));
}

#[test]
fn test_truncated_version_field_is_corrupt() {
    let dir = TempDir::new().unwrap();
    let path = write_archive(&dir, "short", &[0x42, 0x50]);
    let result = ArchiveReader::open(&path);
    assert!(matches!(result, Err(BpkgError::CorruptArchive(_))));
}

#[test]
fn test_missing_header_terminator_is_corrupt() {
    let dir = TempDir::new().unwrap();
    let mut bytes = REVISION.to_be_bytes().to_vec();
    bytes.extend_from_slice(b"orphan path bytes with no terminator");
    let path = write_archive(&dir, "unterminated", &bytes);

    let result = ArchiveReader::open(&path);
    assert!(matches!(result, Err(BpkgError::CorruptArchive(_))));
}

#[test]
fn test_truncated_record_is_corrupt() {
    let dir = TempDir::new().unwrap();
    let mut bytes = REVISION.to_be_bytes().to_vec();
    bytes.extend_from_slice(b"a.txt");
    bytes.push(0x19);
    bytes.extend_from_slice(&[0u8; 4]); // half of the offset field
    let path = write_archive(&dir, "truncated", &bytes);

    let result = ArchiveReader::open(&path);
    assert!(matches!(result, Err(BpkgError::CorruptArchive(_))));
}

#[test]
fn test_skew_underflow_is_corrupt() {
    let dir = TempDir::new().unwrap();
    let mut bytes = REVISION.to_be_bytes().to_vec();
    bytes.extend_from_slice(&record("a", 0, 1));
    // The record at ordinal 1 must store values of at least 1
    bytes.extend_from_slice(&record("b", 0, 0));
    bytes.push(0x1D);
    bytes.push(b'x');
    let path = write_archive(&dir, "underflow", &bytes);

    let result = ArchiveReader::open(&path);
    assert!(matches!(result, Err(BpkgError::CorruptArchive(_))));
}

#[test]
fn test_blob_extending_past_end_is_corrupt() {
    let dir = TempDir::new().unwrap();
    let mut bytes = REVISION.to_be_bytes().to_vec();
    bytes.extend_from_slice(&record("a", 0, 100));
    bytes.push(0x1D);
    bytes.extend_from_slice(b"abc"); // far fewer than 100 bytes
    let path = write_archive(&dir, "oversized", &bytes);

    let mut reader = ArchiveReader::open(&path).unwrap();
    let result = reader.load("a");
    assert!(matches!(result, Err(BpkgError::CorruptArchive(_))));
}

#[test]
fn test_load_after_archive_removed() {
    let source = TempDir::new().unwrap();
    fs::write(source.path().join("gone.txt"), b"soon gone").unwrap();
    let out_dir = TempDir::new().unwrap();
    let archive_path = out_dir.path().join("gone.bpkg");
    ArchiveWriter::new().generate(source.path(), &archive_path).unwrap();

    let mut reader = ArchiveReader::open(&archive_path).unwrap();
    fs::remove_file(&archive_path).unwrap();

    // Nothing cached yet, so the per-load re-open surfaces the missing file
    let logical = source.path().join("gone.txt").to_str().unwrap().to_string();
    let result = reader.load(&logical);
    assert!(matches!(result, Err(BpkgError::ArchiveNotFound(_))));
}
