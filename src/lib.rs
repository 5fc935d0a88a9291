//! # haystore
//!
//! A small-object storage engine in the needle-in-haystack family:
//! - Many small objects packed into large append-only data files
//! - Ordered directory index for point lookups and compaction scans
//! - Bump-pointer allocation with a persisted, crash-recoverable cursor
//! - Soft deletes with full-file-rewrite compaction
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Store                                │
//! │                 (volume id → Volume map)                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Volume                                │
//! │        (allocate / put / get / delete / compact)             │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │                                  │
//!            ▼                                  ▼
//!    ┌───────────────┐                  ┌───────────────┐
//!    │   Data File   │                  │   Directory   │
//!    │ (append-only) │                  │ (redb B-tree) │
//!    └───────────────┘                  └───────────────┘
//! ```
//!
//! A write allocates a region past the write cursor, appends a
//! needle header + body, and records the needle in the directory. A read
//! resolves the directory record and reads body bytes at the recorded
//! offset, verifying a CRC32. A delete tombstones the directory record;
//! compaction rewrites the data file to drop tombstoned records and
//! reclaim their space.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;

pub mod directory;
pub mod id;
pub mod needle;
pub mod store;
pub mod volume;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use config::VolumeConfig;
pub use directory::{Directory, RedbDirectory};
pub use error::{HayError, Result};
pub use id::{ClockIdGenerator, IdGenerator};
pub use needle::{Needle, NeedleFlag};
pub use store::Store;
pub use volume::{CompactionStats, Volume};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of haystore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
