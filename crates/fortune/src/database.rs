//! A fortune database loaded entirely into memory.
//!
//! This is the fallback when no index exists: one linear scan reads every
//! record, after which any record is available by position.

use anyhow::{anyhow, Result};
use index::IndexError;
use rand::seq::SliceRandom;
use rand::Rng;
use std::path::Path;
use tracing::debug;

use crate::entry::Fortune;
use crate::text::TextDatabase;

/// Every record of a text database, in file order.
#[derive(Debug, Clone)]
pub struct Database {
    text: TextDatabase,
    delim: char,
    comments: bool,
    records: Vec<String>,
}

impl Database {
    /// Loads all records from the database at `path`.
    ///
    /// Records that hold nothing but a single line ending are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if `delim` is not ASCII or the file cannot be read.
    pub fn open<P: AsRef<Path>>(path: P, delim: char, comments: bool) -> Result<Self> {
        if !delim.is_ascii() {
            return Err(IndexError::InvalidDelimiter(delim).into());
        }
        let text = TextDatabase::open(path)?;
        let records: Vec<String> = text
            .records(delim as u8, comments)?
            .into_iter()
            .map(|r| String::from_utf8_lossy(&r).into_owned())
            .collect();

        debug!(
            path = %text.path().display(),
            records = records.len(),
            "loaded text database"
        );

        Ok(Self {
            text,
            delim,
            comments,
            records,
        })
    }

    /// Raw record texts, in file order.
    #[must_use]
    pub fn records(&self) -> &[String] {
        &self.records
    }

    /// Record at position `i`, if any.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<&str> {
        self.records.get(i).map(String::as_str)
    }

    /// Every record parsed into a [`Fortune`].
    #[must_use]
    pub fn fortunes(&self) -> Vec<Fortune> {
        self.records.iter().map(|r| Fortune::parse(r)).collect()
    }

    /// A record chosen uniformly at random.
    ///
    /// # Errors
    ///
    /// Returns an error if the database holds no records.
    pub fn random(&self) -> Result<&str> {
        self.random_with(&mut rand::thread_rng())
    }

    /// Like [`random`](Database::random) but draws from `rng`.
    pub fn random_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&str> {
        self.records
            .choose(rng)
            .map(String::as_str)
            .ok_or_else(|| anyhow!("database {} has no records", self.text.path().display()))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.text.path()
    }

    #[must_use]
    pub fn delim(&self) -> char {
        self.delim
    }

    #[must_use]
    pub fn comments(&self) -> bool {
        self.comments
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
