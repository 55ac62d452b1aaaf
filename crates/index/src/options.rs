//! Index build options and the header flag set.

use flags::{Flag, FlagSet};
use std::path::{Path, PathBuf};

use crate::error::{IndexError, Result};

/// Format version written by default.
pub const DEFAULT_VERSION: u32 = 2;

/// Extension appended to the database path when no index path is given.
pub const INDEX_EXTENSION: &str = "dat";

/// Returns the conventional index path for a database: `<db_path>.dat`.
#[must_use]
pub fn default_index_path(db_path: &Path) -> PathBuf {
    let mut path = db_path.as_os_str().to_owned();
    path.push(".");
    path.push(INDEX_EXTENSION);
    PathBuf::from(path)
}

/// The booleans stored in the header's `flags` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexFlag {
    /// Pointers were shuffled into a random order.
    Randomized,
    /// Pointers were sorted by the first alphanumeric character of each record.
    Ordered,
    /// Reserved for rotated (Caesar-ciphered) records. Stored, never acted on.
    Rotated,
    /// Lines starting with a doubled delimiter were treated as comments.
    Comments,
}

impl Flag for IndexFlag {
    const ALL: &'static [Self] = &[
        IndexFlag::Randomized,
        IndexFlag::Ordered,
        IndexFlag::Rotated,
        IndexFlag::Comments,
    ];

    fn bit(self) -> u32 {
        match self {
            IndexFlag::Randomized => 0,
            IndexFlag::Ordered => 1,
            IndexFlag::Rotated => 2,
            IndexFlag::Comments => 3,
        }
    }

    fn name(self) -> &'static str {
        match self {
            IndexFlag::Randomized => "randomized",
            IndexFlag::Ordered => "ordered",
            IndexFlag::Rotated => "rotated",
            IndexFlag::Comments => "comments",
        }
    }
}

/// Packed header flags.
pub type IndexFlags = FlagSet<IndexFlag>;

/// Options controlling how an index is built.
///
/// Start from [`IndexOptions::DEFAULT`] (or `Default::default()`) and override
/// fields with struct update syntax:
///
/// ```rust
/// use index::IndexOptions;
///
/// let opts = IndexOptions { ordered: true, ..IndexOptions::default() };
/// assert_eq!(opts.delim, '%');
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexOptions {
    /// Where to write the index. `None` means `<database>.dat`.
    pub index_path: Option<PathBuf>,
    /// Version tag written to the header.
    pub version: u32,
    /// Record delimiter. Must be a single-byte (ASCII) character.
    pub delim: char,
    /// Shuffle the pointer table.
    pub randomized: bool,
    /// Sort the pointer table by first alphanumeric character. Wins over
    /// `randomized`.
    pub ordered: bool,
    /// Reserved. Recorded in the header only.
    pub rotated: bool,
    /// Skip lines starting with the delimiter twice.
    pub comments: bool,
}

impl IndexOptions {
    /// The default configuration.
    pub const DEFAULT: IndexOptions = IndexOptions {
        index_path: None,
        version: DEFAULT_VERSION,
        delim: '%',
        randomized: false,
        ordered: false,
        rotated: false,
        comments: false,
    };

    /// Returns a copy where `ordered` has cleared `randomized`.
    ///
    /// An ordered index cannot also be shuffled; ordering wins.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.ordered {
            self.randomized = false;
        }
        self
    }

    /// Returns the delimiter as the byte the scanner matches on.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidDelimiter`] if `delim` is not ASCII.
    pub fn delim_byte(&self) -> Result<u8> {
        if self.delim.is_ascii() {
            Ok(self.delim as u8)
        } else {
            Err(IndexError::InvalidDelimiter(self.delim))
        }
    }

    /// Packs the four booleans into a flag set.
    #[must_use]
    pub fn flags(&self) -> IndexFlags {
        IndexFlags::new()
            .with(IndexFlag::Randomized, self.randomized)
            .with(IndexFlag::Ordered, self.ordered)
            .with(IndexFlag::Rotated, self.rotated)
            .with(IndexFlag::Comments, self.comments)
    }

    /// Rebuilds options from a version, delimiter byte and packed flags, as
    /// stored in an index header.
    #[must_use]
    pub fn from_parts(version: u32, delim: u8, flags: IndexFlags) -> Self {
        Self {
            index_path: None,
            version,
            delim: char::from(delim),
            randomized: flags.get(IndexFlag::Randomized),
            ordered: flags.get(IndexFlag::Ordered),
            rotated: flags.get(IndexFlag::Rotated),
            comments: flags.get(IndexFlag::Comments),
        }
    }
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}
