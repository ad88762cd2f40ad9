//! Fixed-width big-endian integer codec shared by the reader and generator.
//!
//! All multi-byte integers in a BPKG file are stored most-significant-byte
//! first. Widths are fixed by the array types, so a short source surfaces as
//! `io::ErrorKind::UnexpectedEof` rather than a silently truncated value.

use crate::error::Result;
use std::io::{Read, Write};

pub(crate) fn read_u32<R: Read>(mut reader: R) -> Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_be_bytes(buf))
}

pub(crate) fn read_u64<R: Read>(mut reader: R) -> Result<u64> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(u64::from_be_bytes(buf))
}

pub(crate) fn write_u32<W: Write>(mut writer: W, value: u32) -> Result<()> {
    writer.write_all(&value.to_be_bytes())?;
    Ok(())
}

pub(crate) fn write_u64<W: Write>(mut writer: W, value: u64) -> Result<()> {
    writer.write_all(&value.to_be_bytes())?;
    Ok(())
}
