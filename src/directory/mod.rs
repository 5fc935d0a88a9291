//! Directory Module
//!
//! The ordered index mapping object id → needle metadata.
//!
//! ## Responsibilities
//! - Durable point lookups by id
//! - Full forward scans in ascending id order (drives compaction)
//! - Persist independently of the volume's data file
//!
//! ## Capability Contract
//! Any ordered key-value engine satisfies the `Directory` trait. The
//! reference backend is `RedbDirectory`, built on redb's B-tree tables.
//! Records are persisted as the codec-encoded bytes of the needle; the key
//! is the `u64` id. Concurrent mutation of the directory during an open
//! scan has undefined effect on that scan's results, but must never corrupt
//! the backing store.

mod backend;

pub use backend::RedbDirectory;

use crate::error::Result;
use crate::needle::Needle;

/// Forward scan over directory entries in ascending id order.
/// The scan is released when dropped.
pub type DirectoryScan = Box<dyn Iterator<Item = Result<(u64, Needle)>> + Send>;

/// Ordered index from object id to needle metadata
pub trait Directory: Send + Sync {
    /// Look up a needle by id; fails with `NotFound` if absent
    fn get(&self, id: u64) -> Result<Needle>;

    /// Insert or overwrite the record for `id`
    fn set(&self, id: u64, needle: &Needle) -> Result<()>;

    /// Whether a record for `id` exists (deleted or not)
    fn has(&self, id: u64) -> Result<bool>;

    /// Remove the record for `id` entirely (used by compaction; soft delete
    /// goes through `set` with a tombstone flag instead)
    fn delete(&self, id: u64) -> Result<()>;

    /// Scan all records in ascending id order
    fn scan(&self) -> Result<DirectoryScan>;
}
