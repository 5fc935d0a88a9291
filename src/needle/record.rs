//! Needle record definition
//!
//! The metadata half of a stored object. Body bytes live in the volume's
//! data file and are reached through the offset recorded here.

use crate::error::{HayError, Result};

/// Tombstone marker for a needle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum NeedleFlag {
    /// Live record
    Normal = 0,

    /// Soft-deleted; bytes remain in the data file until compaction
    Deleted = 1,
}

impl NeedleFlag {
    pub(crate) fn from_byte(b: u8) -> Result<Self> {
        match b {
            0 => Ok(NeedleFlag::Normal),
            1 => Ok(NeedleFlag::Deleted),
            other => Err(HayError::InvalidFlag(other)),
        }
    }
}

/// One stored object's metadata
///
/// Invariant: for any two live needles in the same volume, the byte ranges
/// `[offset, offset + header_size(ext.len()) + size)` are disjoint. Body
/// bytes are immutable once written; only `flag` and `updated_at` mutate,
/// in place, via the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Needle {
    /// Unique id within a volume, caller- or generator-assigned
    pub id: u64,

    /// Body length in bytes
    pub size: u64,

    /// Byte offset of this record's header start in the data file
    pub offset: u64,

    /// Tombstone marker
    pub flag: NeedleFlag,

    /// Short file extension, used downstream for content-type guessing
    pub ext: String,

    /// CRC32 over body bytes, computed at write time
    pub checksum: u32,

    /// Unix seconds
    pub created_at: u64,

    /// Unix seconds; bumped when the needle is tombstoned
    pub updated_at: u64,
}

impl Needle {
    /// Total on-disk length of this record: header + extension + body
    pub fn record_len(&self) -> u64 {
        super::header_size(self.ext.len() as u64) + self.size
    }

    /// Offset of the first body byte in the data file
    pub fn body_offset(&self) -> u64 {
        self.offset + super::header_size(self.ext.len() as u64)
    }

    /// Whether this needle is tombstoned
    pub fn is_deleted(&self) -> bool {
        self.flag == NeedleFlag::Deleted
    }
}
