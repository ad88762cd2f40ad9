//! Chunked streaming copy used by the generator's build and merge phases.

use crate::error::Result;
use std::io::{ErrorKind, Read, Write};

/// Copy `reader` into `writer` until end of input, moving at most
/// `chunk_size` bytes per step. Returns the number of bytes copied.
///
/// Peak memory is a single chunk, independent of the input size.
pub(crate) fn copy_chunked<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    chunk_size: usize,
) -> Result<u64> {
    debug_assert!(chunk_size > 0);

    let mut buf = vec![0u8; chunk_size];
    let mut total: u64 = 0;
    loop {
        let read = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };
        writer.write_all(&buf[..read])?;
        total += read as u64;
    }
    Ok(total)
}
