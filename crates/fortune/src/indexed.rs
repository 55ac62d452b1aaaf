//! Random access to a text database through its index.

use anyhow::{bail, Context, Result};
use index::{default_index_path, IndexReader};
use rand::Rng;
use std::path::Path;
use tracing::warn;

use crate::entry::Fortune;
use crate::text::TextDatabase;

/// A text database paired with its index.
///
/// Picking a random record costs one pointer lookup plus one bounded read
/// from the text file, independent of the database size. Delimiter and
/// comment handling are taken from the index header, so the records are
/// read back the same way they were scanned.
#[derive(Debug)]
pub struct IndexedDatabase {
    text: TextDatabase,
    reader: IndexReader,
    delim: u8,
    comments: bool,
}

impl IndexedDatabase {
    /// Opens `db_path` together with the index at `<db_path>.dat`.
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let index_path = default_index_path(db_path.as_ref());
        Self::open_with_index(db_path, index_path)
    }

    /// Opens `db_path` together with the index at `index_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if either file is missing or the index is corrupt.
    /// A size mismatch between the database and the size recorded in the
    /// index is logged as a warning only.
    pub fn open_with_index<P, Q>(db_path: P, index_path: Q) -> Result<Self>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let text = TextDatabase::open(db_path)?;
        let reader = IndexReader::open(index_path.as_ref())
            .with_context(|| format!("opening index {}", index_path.as_ref().display()))?;

        let indexed_len = u64::from(reader.eof_offset()?);
        if indexed_len != text.len() {
            warn!(
                database = %text.path().display(),
                indexed_len,
                current_len = text.len(),
                "text database size differs from index; index may be stale"
            );
        }

        let header = reader.header();
        let delim = header.delim;
        let comments = reader.options().comments;

        Ok(Self {
            text,
            reader,
            delim,
            comments,
        })
    }

    /// Returns the raw text of a record chosen uniformly at random.
    ///
    /// # Errors
    ///
    /// Fails with [`IndexError::Empty`](index::IndexError::Empty) if the index
    /// has no records, or if the pointer no longer lands on a record.
    pub fn random(&self) -> Result<String> {
        let offset = self.reader.random_pointer()?;
        self.read_at(offset)
    }

    /// Like [`random`](IndexedDatabase::random) but draws from `rng`.
    pub fn random_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<String> {
        let offset = self.reader.random_pointer_with(rng)?;
        self.read_at(offset)
    }

    /// A random record parsed into a [`Fortune`].
    pub fn random_fortune(&self) -> Result<Fortune> {
        Ok(Fortune::parse(&self.random()?))
    }

    /// Raw text of the record at pointer-table position `i`.
    ///
    /// A pointer to a blank record yields the next record in the file, so
    /// every result is one of [`Database::records`](crate::Database::records).
    pub fn record_at(&self, i: usize) -> Result<String> {
        let offset = self.reader.get_pointer_at(i)?;
        self.read_at(offset)
    }

    #[must_use]
    pub fn reader(&self) -> &IndexReader {
        &self.reader
    }

    #[must_use]
    pub fn text(&self) -> &TextDatabase {
        &self.text
    }

    /// Number of indexed records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reader.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reader.is_empty()
    }

    fn read_at(&self, offset: u32) -> Result<String> {
        let bytes = self
            .text
            .read_record_at(u64::from(offset), self.delim, self.comments)?;
        if bytes.is_empty() {
            bail!(
                "no record at offset {} in {}; is the index stale?",
                offset,
                self.text.path().display()
            );
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
