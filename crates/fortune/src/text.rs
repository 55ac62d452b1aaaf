//! Byte-offset access to a text database.
//!
//! A `TextDatabase` only remembers the path and the file size seen at open.
//! Every read opens the file, seeks, reads, and closes it again, so a handle
//! is never held between calls.

use anyhow::{bail, Context, Result};
use index::{LineKind, LineReader};
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// A delimiter-separated text database on disk.
#[derive(Debug, Clone)]
pub struct TextDatabase {
    path: PathBuf,
    /// End-of-file position when opened.
    len: u64,
}

/// True when a record holds nothing once one trailing line ending is removed.
fn is_blank(record: &[u8]) -> bool {
    matches!(record, [] | [b'\n'] | [b'\r'] | [b'\r', b'\n'])
}

impl TextDatabase {
    /// Opens the database at `path` and records its size.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be read.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)
            .with_context(|| format!("opening text database {}", path.display()))?;
        let len = file.metadata()?.len();
        Ok(Self { path, len })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// End-of-file position in bytes.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Reads up to `len` bytes starting at `offset`. Fewer bytes are
    /// returned if the file ends first.
    pub fn read_bytes(&self, offset: u64, len: usize) -> Result<Vec<u8>> {
        let mut f = self.open_at(offset)?;
        let mut buf = Vec::with_capacity(len);
        f.by_ref().take(len as u64).read_to_end(&mut buf)?;
        Ok(buf)
    }

    /// Reads the record starting at `offset`: every line up to (not
    /// including) the next delimiter line or end of file. Comment lines are
    /// skipped when `comments` is set. A blank record is passed over and
    /// the next one is returned instead; the result is empty only when no
    /// record follows `offset`.
    ///
    /// # Errors
    ///
    /// Returns an error if `offset` lies at or beyond the end of the file,
    /// which usually means the index is stale.
    pub fn read_record_at(&self, offset: u64, delim: u8, comments: bool) -> Result<Vec<u8>> {
        if offset >= self.len {
            bail!(
                "offset {} is past the end of {} ({} bytes); is the index stale?",
                offset,
                self.path.display(),
                self.len
            );
        }

        let f = self.open_at(offset)?;
        let mut record = Vec::new();
        for line in LineReader::new(BufReader::new(f), offset) {
            let (_, bytes) = line?;
            match LineKind::classify(&bytes, delim, comments) {
                LineKind::Comment => continue,
                LineKind::Delimiter if is_blank(&record) => record.clear(),
                LineKind::Delimiter => break,
                LineKind::Text => record.extend_from_slice(&bytes),
            }
        }
        if is_blank(&record) {
            record.clear();
        }
        Ok(record)
    }

    /// Reads every record in file order.
    ///
    /// Delimiter lines are dropped, as are comment lines when `comments` is
    /// set. Blank records (nothing but a line ending) are omitted.
    pub fn records(&self, delim: u8, comments: bool) -> Result<Vec<Vec<u8>>> {
        let f = self.open_at(0)?;
        let mut records = Vec::new();
        let mut current = Vec::new();

        for line in LineReader::new(BufReader::new(f), 0) {
            let (_, bytes) = line?;
            match LineKind::classify(&bytes, delim, comments) {
                LineKind::Comment => {}
                LineKind::Delimiter => {
                    if !is_blank(&current) {
                        records.push(std::mem::take(&mut current));
                    }
                    current.clear();
                }
                LineKind::Text => current.extend_from_slice(&bytes),
            }
        }
        if !is_blank(&current) {
            records.push(current);
        }
        Ok(records)
    }

    fn open_at(&self, offset: u64) -> Result<File> {
        let mut f = File::open(&self.path)
            .with_context(|| format!("opening text database {}", self.path.display()))?;
        f.seek(SeekFrom::Start(offset))?;
        Ok(f)
    }
}
