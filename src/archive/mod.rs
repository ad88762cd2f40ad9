mod codec;
mod format;
mod reader;
mod stream;
mod writer;

pub use format::{
    signature_valid, HeaderEntry, HeaderRecord, DEFAULT_CHUNK_SIZE, HEADER_END, INDEX_SIZE,
    MESSAGE_SIZE, PATH_END, REVISION, REVISION_SIGNATURE, SIGNATURE_MASK, VERSION_SIZE,
};
pub use reader::ArchiveReader;
pub use writer::{generate, ArchiveWriter};
