//! # Index - random-access index for fortune databases
//!
//! A fortune database is a plain text file of short records separated by
//! delimiter lines (a line starting with `%` by default). Picking a random
//! record from it naively means reading the whole file. This crate builds a
//! small binary *index* next to the database once, so that any record can
//! later be located with a single seek.
//!
//! ## File layout
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │ HEADER (24 bytes, six u32 BE)                                 │
//! │                                                               │
//! │ version | count | max_len | min_len | flags | delim << 24     │
//! ├───────────────────────────────────────────────────────────────┤
//! │ POINTER TABLE (count * 4 bytes)                               │
//! │                                                               │
//! │ offset (u32 BE) of each record in the text database           │
//! │                                                               │
//! │ ... repeated for each record ...                              │
//! ├───────────────────────────────────────────────────────────────┤
//! │ TRAILER (4 bytes)                                             │
//! │                                                               │
//! │ eof (u32 BE) - size of the text database when indexed         │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! All integers are big-endian. Total size is `24 + 4 * (count + 1)` bytes.
//!
//! `flags` packs four booleans: bit 0 randomized, bit 1 ordered, bit 2
//! rotated (reserved, no effect), bit 3 comments.
//!
//! ## Example
//!
//! ```rust,no_run
//! use index::{IndexOptions, IndexReader, IndexWriter};
//!
//! let writer = IndexWriter::new("fortunes", IndexOptions::default()).unwrap();
//! writer.write().unwrap();
//!
//! let reader = IndexReader::open("fortunes.dat").unwrap();
//! let offset = reader.random_pointer().unwrap();
//! println!("record starts at byte {}", offset);
//! ```

mod error;
mod format;
mod options;
mod reader;
mod scan;
mod writer;

pub use error::{IndexError, Result};
pub use format::{
    index_len, Header, DELIM_SHIFT, HEADER_BYTES, MIN_LEN_SENTINEL, POINTER_BYTES,
};
pub use options::{
    default_index_path, IndexFlag, IndexFlags, IndexOptions, DEFAULT_VERSION, INDEX_EXTENSION,
};
pub use reader::IndexReader;
pub use scan::{first_alnum, scan, LineKind, LineReader, RecordPointer, Scan};
pub use writer::IndexWriter;

#[cfg(test)]
mod tests;
