//! Error types for haystore
//!
//! Provides a unified error type for all operations. Every variant is
//! recoverable at the volume boundary: a failed operation returns to the
//! caller and the volume stays usable.

use thiserror::Error;

/// Result type alias using HayError
pub type Result<T> = std::result::Result<T, HayError>;

/// Unified error type for haystore operations
#[derive(Debug, Error)]
pub enum HayError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    #[error("empty needle record")]
    NilRecord,

    #[error("truncated needle header: expected at least {expected} bytes, got {got}")]
    TruncatedHeader { expected: usize, got: usize },

    #[error("invalid needle flag byte: 0x{0:02x}")]
    InvalidFlag(u8),

    #[error("file extension too long: {0} bytes (max 255)")]
    ExtensionTooLong(usize),

    // -------------------------------------------------------------------------
    // Volume Errors
    // -------------------------------------------------------------------------
    #[error("volume out of space: need {requested} bytes, {remaining} remaining")]
    OutOfSpace { requested: u64, remaining: u64 },

    #[error("needle {0} not found")]
    NotFound(u64),

    #[error("needle {0} is deleted")]
    Deleted(u64),

    #[error("record too small: write of {requested} bytes exceeds {remaining} allocated bytes")]
    RecordTooSmall { requested: u64, remaining: u64 },

    #[error("checksum mismatch: stored {stored:#010x}, computed {computed:#010x}")]
    ChecksumMismatch { stored: u32, computed: u32 },

    #[error("compaction failed: {0}")]
    Compaction(String),

    // -------------------------------------------------------------------------
    // Directory Errors
    // -------------------------------------------------------------------------
    #[error("directory backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("volume {0} already exists")]
    VolumeExists(u64),

    #[error("volume {0} not found")]
    VolumeNotFound(u64),
}

impl HayError {
    /// Wrap a directory-backend error without reinterpreting it
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        HayError::Backend(Box::new(err))
    }
}
