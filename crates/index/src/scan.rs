//! Single-pass scanner over a delimiter-separated text database.
//!
//! The scanner walks the database line by line, tracking the byte position,
//! and produces one [`RecordPointer`] per non-empty record together with the
//! length statistics stored in the index header.

use std::io::{self, BufRead};

use tracing::debug;

use crate::error::{IndexError, Result};
use crate::format::MIN_LEN_SENTINEL;

/// Classification of one line of a text database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Starts with the delimiter twice and comments are enabled. Ignored.
    Comment,
    /// Starts with the delimiter. Ends the current record.
    Delimiter,
    /// Record content.
    Text,
}

impl LineKind {
    /// Classifies `line`. Comment detection only applies when `comments` is set.
    #[must_use]
    pub fn classify(line: &[u8], delim: u8, comments: bool) -> Self {
        match line {
            [a, b, ..] if comments && *a == delim && *b == delim => LineKind::Comment,
            [a, ..] if *a == delim => LineKind::Delimiter,
            _ => LineKind::Text,
        }
    }
}

/// Where a record starts, plus the key used to order records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordPointer {
    /// Byte offset of the record's first line in the text database.
    pub offset: u32,
    /// First ASCII alphanumeric character on that line, if any.
    ///
    /// Only used to sort pointers while building. Never written to disk.
    pub first_char: Option<char>,
}

impl RecordPointer {
    pub fn new(offset: u32, first_char: Option<char>) -> Self {
        Self { offset, first_char }
    }

    /// Ordering key: first character, then offset. `None` sorts first.
    #[must_use]
    pub fn sort_key(&self) -> (Option<char>, u32) {
        (self.first_char, self.offset)
    }
}

/// Result of scanning a text database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scan {
    /// One pointer per non-empty record, in file order.
    pub pointers: Vec<RecordPointer>,
    /// Length of the longest record (0 if there are none).
    pub max_len: u32,
    /// Length of the shortest record ([`MIN_LEN_SENTINEL`] if there are none).
    pub min_len: u32,
    /// Total number of bytes in the database.
    pub eof: u32,
}

/// Returns the first ASCII alphanumeric character in `line`.
#[must_use]
pub fn first_alnum(line: &[u8]) -> Option<char> {
    line.iter()
        .find(|b| b.is_ascii_alphanumeric())
        .map(|&b| char::from(b))
}

/// Iterator over the raw lines of a reader, newline included, each tagged
/// with its starting byte offset.
pub struct LineReader<R> {
    inner: R,
    pos: u64,
}

impl<R: BufRead> LineReader<R> {
    /// Wraps `inner`, treating its current position as offset `start`.
    pub fn new(inner: R, start: u64) -> Self {
        Self { inner, pos: start }
    }

    /// Offset just past the last line returned.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.pos
    }
}

impl<R: BufRead> Iterator for LineReader<R> {
    type Item = io::Result<(u64, Vec<u8>)>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = Vec::new();
        match self.inner.read_until(b'\n', &mut line) {
            Ok(0) => None,
            Ok(n) => {
                let start = self.pos;
                self.pos += n as u64;
                Some(Ok((start, line)))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// Running state for the record currently being accumulated.
struct Pending {
    offset: u64,
    first_char: Option<char>,
    len: u64,
}

/// Collects pointers and length statistics.
struct Collector {
    pointers: Vec<RecordPointer>,
    max_len: u64,
    min_len: u64,
}

impl Collector {
    fn finish(&mut self, record: Pending) -> Result<()> {
        if record.len == 0 {
            return Ok(());
        }
        self.pointers
            .push(RecordPointer::new(to_u32(record.offset)?, record.first_char));
        self.max_len = self.max_len.max(record.len);
        self.min_len = self.min_len.min(record.len);
        Ok(())
    }
}

fn to_u32(value: u64) -> Result<u32> {
    u32::try_from(value).map_err(|_| IndexError::TooLarge(value))
}

/// Scans a text database.
///
/// - A record starts at the first text line after a delimiter line (or at
///   the start of input). Its offset is that line's first byte.
/// - Each text line adds its byte length, newline included, to the record.
///   Delimiter lines add nothing.
/// - A record ends at a delimiter line or at end of input. Records of length
///   zero (e.g. two delimiters in a row) are dropped.
/// - With `comments` set, lines starting with the delimiter twice are skipped
///   as if absent.
///
/// # Errors
///
/// Returns [`IndexError::Io`] on read failure and [`IndexError::TooLarge`] if
/// an offset or length does not fit in a `u32`.
pub fn scan<R: BufRead>(input: R, delim: u8, comments: bool) -> Result<Scan> {
    let mut lines = LineReader::new(input, 0);
    let mut out = Collector {
        pointers: Vec::new(),
        max_len: 0,
        min_len: u64::from(MIN_LEN_SENTINEL),
    };
    let mut pending: Option<Pending> = None;

    for line in lines.by_ref() {
        let (start, bytes) = line?;
        match LineKind::classify(&bytes, delim, comments) {
            LineKind::Comment => {}
            LineKind::Delimiter => {
                if let Some(record) = pending.take() {
                    out.finish(record)?;
                }
            }
            LineKind::Text => {
                let record = pending.get_or_insert_with(|| Pending {
                    offset: start,
                    first_char: first_alnum(&bytes),
                    len: 0,
                });
                record.len += bytes.len() as u64;
            }
        }
    }

    // Last record needs no trailing delimiter.
    if let Some(record) = pending.take() {
        out.finish(record)?;
    }

    let scan = Scan {
        max_len: to_u32(out.max_len)?,
        min_len: to_u32(out.min_len)?,
        eof: to_u32(lines.position())?,
        pointers: out.pointers,
    };

    debug!(
        count = scan.pointers.len(),
        max_len = scan.max_len,
        min_len = scan.min_len,
        eof = scan.eof,
        "scanned text database"
    );

    Ok(scan)
}
