use byteorder::{BigEndian, ReadBytesExt};
use rand::Rng;
use std::fs::File;
use std::io::{BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, trace};

use crate::error::{IndexError, Result};
use crate::format::{index_len, read_pointers, Header, HEADER_BYTES, POINTER_BYTES};
use crate::options::{IndexFlags, IndexOptions};

/// Reads an index file for random record lookups.
///
/// On [`open`](IndexReader::open) only the 24-byte **header** is parsed and
/// cached. Pointers are read on demand: a single lookup is one seek plus a
/// 4-byte read, independent of the number of records.
///
/// A persistent file handle is kept open for the lifetime of the reader,
/// wrapped in a `Mutex` so lookups can go through a shared `&self`. The
/// reader never writes to the file.
#[derive(Debug)]
pub struct IndexReader {
    /// Path to the index file on disk (kept for diagnostics).
    path: PathBuf,
    /// Header fields exactly as stored.
    fields: [u32; 6],
    /// Decoded header.
    header: Header,
    file: Mutex<BufReader<File>>,
}

impl IndexReader {
    /// Opens an index file and parses its header.
    ///
    /// # Validation
    ///
    /// - The file must hold at least the 24-byte header.
    /// - Reserved flag bits and the low bytes of the delimiter field must be
    ///   zero.
    /// - The file must be long enough for `count` pointers plus the trailing
    ///   eof value.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Io`] if the file cannot be opened or read, and
    /// [`IndexError::Corrupt`] if it fails validation.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut f = File::open(&path)?;
        let filesize = f.metadata()?.len();

        if filesize < HEADER_BYTES {
            return Err(IndexError::Corrupt(format!(
                "file too small for header: {} bytes",
                filesize
            )));
        }

        let header = Header::read_from(&mut f)?;
        // Decoding rejects every bit it does not understand, so re-encoding
        // reproduces the on-disk integers exactly.
        let fields = header.to_fields();

        let expected = index_len(header.count);
        if filesize < expected {
            return Err(IndexError::Corrupt(format!(
                "pointer table extends past end of file: {} pointers need {} bytes, file has {}",
                header.count, expected, filesize
            )));
        }

        debug!(
            path = %path.display(),
            version = header.version,
            count = header.count,
            "opened index"
        );

        Ok(Self {
            path,
            fields,
            header,
            file: Mutex::new(BufReader::new(f)),
        })
    }

    /// The six header integers in on-disk order, uninterpreted.
    #[must_use]
    pub fn header_fields(&self) -> [u32; 6] {
        self.fields
    }

    /// The decoded header.
    #[must_use]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// The build options recorded in the header.
    #[must_use]
    pub fn options(&self) -> IndexOptions {
        IndexOptions::from_parts(self.header.version, self.header.delim, self.header.flags)
    }

    /// Reads the whole pointer table.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure.
    pub fn get_pointers(&self) -> Result<Vec<u32>> {
        let mut f = self.lock()?;
        f.seek(SeekFrom::Start(HEADER_BYTES))?;
        Ok(read_pointers(&mut *f, self.header.count)?)
    }

    /// Reads the pointer at table position `index`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::OutOfRange`] if `index >= count`, or an I/O
    /// error.
    pub fn get_pointer_at(&self, index: usize) -> Result<u32> {
        if index >= self.header.count as usize {
            return Err(IndexError::OutOfRange {
                index,
                count: self.header.count,
            });
        }

        let pos = HEADER_BYTES + POINTER_BYTES * index as u64;
        let mut f = self.lock()?;
        f.seek(SeekFrom::Start(pos))?;
        let pointer = f.read_u32::<BigEndian>()?;

        trace!(index, pointer, "pointer lookup");
        Ok(pointer)
    }

    /// Returns a pointer chosen uniformly at random.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Empty`] if the index has no records.
    pub fn random_pointer(&self) -> Result<u32> {
        self.random_pointer_with(&mut rand::thread_rng())
    }

    /// Like [`random_pointer`](IndexReader::random_pointer) but draws from
    /// `rng`.
    pub fn random_pointer_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<u32> {
        if self.header.count == 0 {
            return Err(IndexError::Empty);
        }
        let index = rng.gen_range(0..self.header.count as usize);
        self.get_pointer_at(index)
    }

    /// Reads the end-of-file offset of the text database stored after the
    /// pointer table.
    pub fn eof_offset(&self) -> Result<u32> {
        let pos = HEADER_BYTES + POINTER_BYTES * u64::from(self.header.count);
        let mut f = self.lock()?;
        f.seek(SeekFrom::Start(pos))?;
        Ok(f.read_u32::<BigEndian>()?)
    }

    /// Path to the index file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn version(&self) -> u32 {
        self.header.version
    }

    /// Number of pointers.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.header.count
    }

    #[must_use]
    pub fn max_len(&self) -> u32 {
        self.header.max_len
    }

    #[must_use]
    pub fn min_len(&self) -> u32 {
        self.header.min_len
    }

    #[must_use]
    pub fn flags(&self) -> IndexFlags {
        self.header.flags
    }

    #[must_use]
    pub fn delim(&self) -> char {
        char::from(self.header.delim)
    }

    /// Number of records in the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.header.count as usize
    }

    /// Returns `true` if the index contains zero records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.header.count == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, BufReader<File>>> {
        self.file.lock().map_err(|_| IndexError::Poisoned)
    }
}
