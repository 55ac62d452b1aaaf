//! Error types for index operations.

use std::io;
use thiserror::Error;

/// Errors that can occur while building or reading an index.
#[derive(Debug, Error)]
pub enum IndexError {
    /// An underlying I/O error (missing file, permission denied, short read).
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// The index file does not match the expected layout.
    #[error("corrupt index: {0}")]
    Corrupt(String),

    /// A random pointer was requested from an index with no records.
    #[error("index is empty: no records to choose from")]
    Empty,

    /// A pointer was requested past the end of the pointer table.
    #[error("pointer index {index} out of range (count = {count})")]
    OutOfRange { index: usize, count: u32 },

    /// The configured delimiter does not fit in a single byte.
    #[error("delimiter {0:?} is not a single-byte ASCII character")]
    InvalidDelimiter(char),

    /// The text database is too large for 32-bit offsets.
    #[error("database too large for a 32-bit index: {0} bytes")]
    TooLarge(u64),

    /// The reader's file handle lock was poisoned by a panicking thread.
    #[error("index file lock poisoned")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, IndexError>;
