//! Index binary format constants and header/body read/write helpers.
//!
//! ## Header (24 bytes)
//!
//! ```text
//! [version: u32 BE][count: u32 BE][max_len: u32 BE][min_len: u32 BE]
//! [flags: u32 BE][delim << 24: u32 BE]
//! ```
//!
//! ## Body
//!
//! ```text
//! [offset: u32 BE] * count
//! [eof: u32 BE]
//! ```

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Result as IoResult, Write};

use crate::error::{IndexError, Result};
use crate::options::IndexFlags;

/// Size of the header in bytes: six `u32` fields.
pub const HEADER_BYTES: u64 = 6 * 4;

/// Size of one pointer-table entry (and of the trailing eof value).
pub const POINTER_BYTES: u64 = 4;

/// Initial `min_len`. Any real record is shorter, so the first one always
/// replaces it. An empty database keeps this value on disk.
pub const MIN_LEN_SENTINEL: u32 = u32::MAX;

/// The delimiter byte lives in the top byte of the last header field.
pub const DELIM_SHIFT: u32 = 24;

/// Exact size of an index file holding `count` pointers.
#[must_use]
pub fn index_len(count: u32) -> u64 {
    HEADER_BYTES + POINTER_BYTES * (u64::from(count) + 1)
}

/// Decoded index header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Format version tag.
    pub version: u32,
    /// Number of pointers in the table.
    pub count: u32,
    /// Length in bytes of the longest record.
    pub max_len: u32,
    /// Length in bytes of the shortest record ([`MIN_LEN_SENTINEL`] if none).
    pub min_len: u32,
    /// Randomized / ordered / rotated / comments.
    pub flags: IndexFlags,
    /// Delimiter byte.
    pub delim: u8,
}

impl Header {
    /// Returns the six raw header integers in on-disk order.
    ///
    /// The delimiter is returned packed (`delim << 24`), exactly as stored.
    #[must_use]
    pub fn to_fields(&self) -> [u32; 6] {
        [
            self.version,
            self.count,
            self.max_len,
            self.min_len,
            self.flags.bits(),
            u32::from(self.delim) << DELIM_SHIFT,
        ]
    }

    /// Decodes six raw header integers.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Corrupt`] if reserved flag bits are set or the
    /// low three bytes of the delimiter field are non-zero.
    pub fn from_fields(fields: [u32; 6]) -> Result<Self> {
        let [version, count, max_len, min_len, raw_flags, delim_packed] = fields;

        let flags = IndexFlags::from_bits(raw_flags).ok_or_else(|| {
            IndexError::Corrupt(format!("reserved flag bits set: {:#010x}", raw_flags))
        })?;

        if delim_packed & ((1 << DELIM_SHIFT) - 1) != 0 {
            return Err(IndexError::Corrupt(format!(
                "delimiter field has non-zero low bytes: {:#010x}",
                delim_packed
            )));
        }

        Ok(Self {
            version,
            count,
            max_len,
            min_len,
            flags,
            delim: (delim_packed >> DELIM_SHIFT) as u8,
        })
    }

    /// Serializes the header (24 bytes) to `w`.
    pub fn write_to<W: Write>(&self, w: &mut W) -> IoResult<()> {
        for field in self.to_fields() {
            w.write_u32::<BigEndian>(field)?;
        }
        Ok(())
    }

    /// Reads the six raw header integers from `r` without interpreting them.
    pub fn read_fields<R: Read>(r: &mut R) -> IoResult<[u32; 6]> {
        let mut fields = [0u32; 6];
        for field in fields.iter_mut() {
            *field = r.read_u32::<BigEndian>()?;
        }
        Ok(fields)
    }

    /// Reads and decodes a header from `r`.
    pub fn read_from<R: Read>(r: &mut R) -> Result<Self> {
        let fields = Self::read_fields(r)?;
        Self::from_fields(fields)
    }
}

/// Writes the pointer table: one big-endian `u32` per offset.
pub fn write_pointers<W, I>(w: &mut W, offsets: I) -> IoResult<()>
where
    W: Write,
    I: IntoIterator<Item = u32>,
{
    for offset in offsets {
        w.write_u32::<BigEndian>(offset)?;
    }
    Ok(())
}

/// Writes the trailing end-of-file value.
pub fn write_eof<W: Write>(w: &mut W, eof: u32) -> IoResult<()> {
    w.write_u32::<BigEndian>(eof)
}

/// Reads `count` consecutive pointers from `r`.
pub fn read_pointers<R: Read>(r: &mut R, count: u32) -> IoResult<Vec<u32>> {
    let mut pointers = Vec::with_capacity(count as usize);
    for _ in 0..count {
        pointers.push(r.read_u32::<BigEndian>()?);
    }
    Ok(pointers)
}
