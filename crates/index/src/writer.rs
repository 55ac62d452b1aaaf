use rand::seq::SliceRandom;
use rand::Rng;
use std::ffi::OsString;
use std::fs::{remove_file, rename, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{IndexError, Result};
use crate::format::{index_len, write_eof, write_pointers, Header, HEADER_BYTES, POINTER_BYTES};
use crate::options::{default_index_path, IndexFlags, IndexOptions};
use crate::scan::{scan, RecordPointer};

/// Builds the index for a text database.
///
/// All of the work happens in [`new`](IndexWriter::new): the database is
/// scanned once, eagerly, and the pointer table is ordered or shuffled as
/// requested. Nothing touches the disk until [`write`](IndexWriter::write)
/// is called, so the computed statistics can be inspected first.
#[derive(Debug, Clone)]
pub struct IndexWriter {
    db_path: PathBuf,
    index_path: PathBuf,
    /// Options after normalization (`ordered` clears `randomized`).
    options: IndexOptions,
    delim: u8,
    flags: IndexFlags,
    pointers: Vec<RecordPointer>,
    /// Pointer count as of the scan.
    count: u32,
    max_len: u32,
    min_len: u32,
    /// Size of the text database when it was scanned.
    eof: u32,
}

impl IndexWriter {
    /// Scans the database at `path` and prepares its index.
    ///
    /// If `options.ordered` is set the pointers are sorted (and
    /// `options.randomized` is ignored); otherwise, if `options.randomized`
    /// is set, they are shuffled.
    ///
    /// # Errors
    ///
    /// Returns an error if the delimiter is not ASCII, if the database cannot
    /// be opened or read, or if it is too large for 32-bit offsets.
    pub fn new<P: AsRef<Path>>(path: P, options: IndexOptions) -> Result<Self> {
        let options = options.normalized();
        let delim = options.delim_byte()?;
        let db_path = path.as_ref().to_path_buf();
        let index_path = options
            .index_path
            .clone()
            .unwrap_or_else(|| default_index_path(&db_path));

        let file = File::open(&db_path)?;
        let scanned = scan(BufReader::new(file), delim, options.comments)?;

        let mut writer = Self {
            db_path,
            index_path,
            delim,
            flags: options.flags(),
            // Every record holds at least one byte, so the count fits
            // wherever the eof offset does.
            count: scanned.pointers.len() as u32,
            pointers: scanned.pointers,
            max_len: scanned.max_len,
            min_len: scanned.min_len,
            eof: scanned.eof,
            options,
        };

        if writer.options.ordered {
            writer.order_pointers();
        } else if writer.options.randomized {
            writer.shuffle_pointers();
        }

        Ok(writer)
    }

    /// Sorts pointers by first alphanumeric character, then by offset.
    ///
    /// Records with no alphanumeric character on their first line sort
    /// before all others. Comparison is case-sensitive (ASCII order).
    pub fn order_pointers(&mut self) {
        self.pointers.sort_by_key(RecordPointer::sort_key);
    }

    /// Shuffles pointers into a uniformly random order.
    pub fn shuffle_pointers(&mut self) {
        self.shuffle_pointers_with(&mut rand::thread_rng());
    }

    /// Shuffles pointers using the given random number generator.
    pub fn shuffle_pointers_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.pointers.shuffle(rng);
    }

    /// Writes the index to [`index_path`](IndexWriter::index_path),
    /// replacing any existing file.
    ///
    /// # Crash Safety
    ///
    /// Writes to `<index_path>.tmp`, calls `sync_all()`, then atomically
    /// renames. Readers never see a half-written index, and the temp file is
    /// removed if any step fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the output location is not writable.
    pub fn write(&self) -> Result<()> {
        let tmp_path = self.tmp_path();
        let written = self
            .write_tmp(&tmp_path)
            .and_then(|()| rename(&tmp_path, &self.index_path).map_err(IndexError::from));
        if let Err(e) = written {
            let _ = remove_file(&tmp_path);
            return Err(e);
        }

        if let Some(parent) = self.index_path.parent() {
            if let Ok(dir) = File::open(parent) {
                let _ = dir.sync_all();
            }
        }

        info!(
            path = %self.index_path.display(),
            count = self.count,
            bytes = index_len(self.count),
            "wrote index"
        );

        Ok(())
    }

    fn write_tmp(&self, tmp_path: &Path) -> Result<()> {
        let raw_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(tmp_path)?;
        let mut file = BufWriter::new(raw_file);

        self.header().write_to(&mut file)?;
        write_pointers(&mut file, self.pointers.iter().map(|p| p.offset))?;
        write_eof(&mut file, self.eof)?;

        file.flush()?;
        file.into_inner().map_err(|e| e.into_error())?.sync_all()?;
        Ok(())
    }

    /// The header as it will be written.
    #[must_use]
    pub fn header(&self) -> Header {
        Header {
            version: self.options.version,
            count: self.count,
            max_len: self.max_len,
            min_len: self.min_len,
            flags: self.flags,
            delim: self.delim,
        }
    }

    /// Byte offsets of the records, in table order.
    #[must_use]
    pub fn offsets(&self) -> Vec<u32> {
        self.pointers.iter().map(|p| p.offset).collect()
    }

    /// The 24-byte serialized header.
    #[must_use]
    pub fn packed_header(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_BYTES as usize);
        // Writes into a Vec cannot fail.
        let _ = self.header().write_to(&mut buf);
        buf
    }

    /// The serialized pointer table (offsets only).
    #[must_use]
    pub fn packed_pointers(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.pointers.len() * POINTER_BYTES as usize);
        let _ = write_pointers(&mut buf, self.pointers.iter().map(|p| p.offset));
        buf
    }

    /// The serialized end-of-file value.
    #[must_use]
    pub fn packed_eof(&self) -> [u8; 4] {
        self.eof.to_be_bytes()
    }

    /// Path of the text database.
    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Where [`write`](IndexWriter::write) puts the index.
    #[must_use]
    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    /// Effective options (`randomized` already cleared if `ordered`).
    #[must_use]
    pub fn options(&self) -> &IndexOptions {
        &self.options
    }

    #[must_use]
    pub fn version(&self) -> u32 {
        self.options.version
    }

    #[must_use]
    pub fn delim(&self) -> char {
        self.options.delim
    }

    #[must_use]
    pub fn flags(&self) -> IndexFlags {
        self.flags
    }

    /// Pointers with their first-character tags, in table order.
    #[must_use]
    pub fn pointers(&self) -> &[RecordPointer] {
        &self.pointers
    }

    /// Replaces the pointer table and updates the header count to match.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::TooLarge`] if there are more than `u32::MAX`
    /// pointers.
    pub fn set_pointers(&mut self, pointers: Vec<RecordPointer>) -> Result<()> {
        let len = pointers.len() as u64;
        self.count = u32::try_from(len).map_err(|_| IndexError::TooLarge(len))?;
        self.pointers = pointers;
        Ok(())
    }

    /// Number of pointers in the table.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    #[must_use]
    pub fn max_len(&self) -> u32 {
        self.max_len
    }

    /// Shortest record length, or [`MIN_LEN_SENTINEL`](crate::MIN_LEN_SENTINEL)
    /// for an empty database.
    #[must_use]
    pub fn min_len(&self) -> u32 {
        self.min_len
    }

    /// Size in bytes of the text database at scan time.
    #[must_use]
    pub fn eof(&self) -> u32 {
        self.eof
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name: OsString = self.index_path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}
