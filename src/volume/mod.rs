//! Volume Module
//!
//! One logical shard of the store: an append-only data file plus its
//! directory index.
//!
//! ## Responsibilities
//! - Bump-pointer space allocation with a persisted write cursor
//! - Writing and reading needle records
//! - Soft delete (tombstones, no space reclamation)
//! - Compaction: full-file rewrite dropping tombstoned records
//!
//! ## Data File Layout
//! ```text
//! ┌──────────────────────┬──────────┬──────────┬─────┬──────────┐
//! │ write cursor (8, BE) │ record 1 │ record 2 │ ... │ record N │
//! └──────────────────────┴──────────┴──────────┴─────┴──────────┘
//! ```
//! The 8-byte bootstrap prefix always mirrors the in-memory write cursor;
//! reopening a volume resumes allocation from it.

mod compact;
mod cursor;
#[allow(clippy::module_inception)]
mod volume;

pub use compact::CompactionStats;
pub use cursor::BodyReader;
pub use volume::{extension_of, Volume, BOOTSTRAP_SIZE};
