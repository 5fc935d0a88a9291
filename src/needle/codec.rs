//! Needle codec
//!
//! Encoding and decoding of the fixed big-endian needle header.
//!
//! Field layout (offsets in bytes):
//! - `0..8`    id
//! - `8..16`   size
//! - `16..24`  offset
//! - `24..28`  checksum
//! - `28..36`  created_at
//! - `36..44`  updated_at
//! - `44`      flag
//! - `45`      ext_len
//! - `46..`    ext (ext_len bytes)

use crate::error::{HayError, Result};
use crate::needle::{Needle, NeedleFlag};

/// Size of the fixed header, not counting the trailing extension
pub const FIXED_HEADER_SIZE: u64 = 46;

/// Longest encodable extension (one length byte)
pub const MAX_EXT_LEN: usize = u8::MAX as usize;

/// Byte range of the `offset` field within an encoded header.
/// Compaction patches this range in place when relocating a record.
pub(crate) const OFFSET_FIELD: std::ops::Range<usize> = 16..24;

/// Total header size for a given extension length
pub fn header_size(ext_len: u64) -> u64 {
    FIXED_HEADER_SIZE + ext_len
}

/// CRC32 (IEEE) over a byte sequence
pub fn checksum(data: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Encode a needle header (including the trailing extension) to bytes
pub fn encode(needle: &Needle) -> Result<Vec<u8>> {
    let ext = needle.ext.as_bytes();
    if ext.len() > MAX_EXT_LEN {
        return Err(HayError::ExtensionTooLong(ext.len()));
    }

    let mut buf = Vec::with_capacity(FIXED_HEADER_SIZE as usize + ext.len());
    buf.extend_from_slice(&needle.id.to_be_bytes());
    buf.extend_from_slice(&needle.size.to_be_bytes());
    buf.extend_from_slice(&needle.offset.to_be_bytes());
    buf.extend_from_slice(&needle.checksum.to_be_bytes());
    buf.extend_from_slice(&needle.created_at.to_be_bytes());
    buf.extend_from_slice(&needle.updated_at.to_be_bytes());
    buf.push(needle.flag as u8);
    buf.push(ext.len() as u8);
    buf.extend_from_slice(ext);
    Ok(buf)
}

/// Decode a needle header from bytes
///
/// Accepts any slice that starts with a complete header + extension; body
/// bytes trailing the extension are ignored, so a whole record region
/// decodes cleanly.
pub fn decode(bytes: &[u8]) -> Result<Needle> {
    if bytes.is_empty() {
        return Err(HayError::NilRecord);
    }
    if bytes.len() < FIXED_HEADER_SIZE as usize {
        return Err(HayError::TruncatedHeader {
            expected: FIXED_HEADER_SIZE as usize,
            got: bytes.len(),
        });
    }

    let ext_len = bytes[45] as usize;
    let total = FIXED_HEADER_SIZE as usize + ext_len;
    if bytes.len() < total {
        return Err(HayError::TruncatedHeader {
            expected: total,
            got: bytes.len(),
        });
    }

    Ok(Needle {
        id: read_u64(&bytes[0..8]),
        size: read_u64(&bytes[8..16]),
        offset: read_u64(&bytes[16..24]),
        checksum: read_u32(&bytes[24..28]),
        created_at: read_u64(&bytes[28..36]),
        updated_at: read_u64(&bytes[36..44]),
        flag: NeedleFlag::from_byte(bytes[44])?,
        ext: String::from_utf8_lossy(&bytes[46..total]).into_owned(),
    })
}

fn read_u64(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(bytes);
    u64::from_be_bytes(buf)
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(bytes);
    u32::from_be_bytes(buf)
}

/// Rewrite the `offset` field inside an already-encoded record region
pub(crate) fn patch_offset(record: &mut [u8], offset: u64) {
    record[OFFSET_FIELD].copy_from_slice(&offset.to_be_bytes());
}
