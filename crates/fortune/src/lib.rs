//! # Fortune - fortune databases with and without an index
//!
//! Ties the [`index`] crate to the text files it describes.
//!
//! ## Architecture
//!
//! ```text
//!              text database (records separated by "%" lines)
//!                 |                              |
//!                 | full scan                    | IndexWriter (once)
//!                 v                              v
//!         ┌──────────────┐              binary index (<db>.dat)
//!         │   Database   │                       |
//!         │ all records  │                       | IndexReader
//!         │  in memory   │                       v
//!         └──────────────┘           ┌────────────────────────┐
//!                                    │    IndexedDatabase     │
//!                                    │ TextDatabase + reader  │
//!                                    │ one seek per random()  │
//!                                    └────────────────────────┘
//! ```
//!
//! ## Module Responsibilities
//!
//! | Module        | Purpose                                               |
//! |---------------|-------------------------------------------------------|
//! | [`text`]      | `TextDatabase`: bounded reads at byte offsets         |
//! | [`database`]  | `Database`: every record loaded by a linear scan      |
//! | [`indexed`]   | `IndexedDatabase`: O(1) random record via the index   |
//! | [`entry`]     | `Fortune`: body / attribution split and rendering     |
//!
//! The index is a snapshot. If the text database changes after the index was
//! written, rebuild the index; a mismatch is only logged, not repaired.

pub mod database;
pub mod entry;
pub mod indexed;
pub mod text;

pub use database::Database;
pub use entry::Fortune;
pub use indexed::IndexedDatabase;
pub use text::TextDatabase;

#[cfg(test)]
mod tests;
