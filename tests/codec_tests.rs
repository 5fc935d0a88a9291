//! Tests for the needle codec
//!
//! These tests verify:
//! - Header encode/decode round-trips
//! - Truncation and empty-input handling
//! - Header size arithmetic
//! - Checksum behavior

use haystore::needle::{
    checksum, decode, encode, header_size, Needle, NeedleFlag, FIXED_HEADER_SIZE,
};
use haystore::HayError;

// =============================================================================
// Helper Functions
// =============================================================================

fn sample_needle(ext: &str) -> Needle {
    Needle {
        id: 7,
        size: 512,
        offset: 8,
        flag: NeedleFlag::Normal,
        ext: ext.to_string(),
        checksum: checksum(b"hello"),
        created_at: 1_700_000_000,
        updated_at: 1_700_000_000,
    }
}

// =============================================================================
// Round-Trip Tests
// =============================================================================

#[test]
fn test_roundtrip_with_extension() {
    let needle = sample_needle("jpg");
    let encoded = encode(&needle).unwrap();
    assert_eq!(encoded.len(), header_size(3) as usize);

    let decoded = decode(&encoded).unwrap();
    assert_eq!(decoded, needle);
}

#[test]
fn test_roundtrip_empty_extension() {
    let needle = sample_needle("");
    let encoded = encode(&needle).unwrap();
    assert_eq!(encoded.len(), FIXED_HEADER_SIZE as usize);
    assert_eq!(decode(&encoded).unwrap(), needle);
}

#[test]
fn test_roundtrip_deleted_flag() {
    let mut needle = sample_needle("txt");
    needle.flag = NeedleFlag::Deleted;
    needle.updated_at = needle.created_at + 60;

    let decoded = decode(&encode(&needle).unwrap()).unwrap();
    assert_eq!(decoded.flag, NeedleFlag::Deleted);
    assert_eq!(decoded, needle);
}

#[test]
fn test_decode_ignores_trailing_body_bytes() {
    let needle = sample_needle("png");
    let mut region = encode(&needle).unwrap();
    region.extend_from_slice(b"body bytes that follow the header on disk");

    assert_eq!(decode(&region).unwrap(), needle);
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[test]
fn test_decode_empty_input() {
    assert!(matches!(decode(&[]), Err(HayError::NilRecord)));
}

#[test]
fn test_decode_truncated_header() {
    let err = decode(&[0u8; 20]).unwrap_err();
    match err {
        HayError::TruncatedHeader { expected, got } => {
            assert_eq!(expected, FIXED_HEADER_SIZE as usize);
            assert_eq!(got, 20);
        }
        other => panic!("expected TruncatedHeader, got {other:?}"),
    }
}

#[test]
fn test_decode_truncated_extension() {
    let needle = sample_needle("jpeg");
    let encoded = encode(&needle).unwrap();

    // Cut into the extension bytes
    let err = decode(&encoded[..encoded.len() - 2]).unwrap_err();
    assert!(matches!(
        err,
        HayError::TruncatedHeader {
            expected: 50,
            got: 48
        }
    ));
}

#[test]
fn test_decode_rejects_unknown_flag() {
    let needle = sample_needle("gif");
    let mut encoded = encode(&needle).unwrap();
    encoded[44] = 0x7f;

    assert!(matches!(decode(&encoded), Err(HayError::InvalidFlag(0x7f))));
}

#[test]
fn test_encode_rejects_oversized_extension() {
    let needle = sample_needle(&"x".repeat(300));
    assert!(matches!(
        encode(&needle),
        Err(HayError::ExtensionTooLong(300))
    ));
}

// =============================================================================
// Arithmetic Tests
// =============================================================================

#[test]
fn test_header_size() {
    assert_eq!(header_size(0), 46);
    assert_eq!(header_size(3), 49);
    assert_eq!(header_size(255), 301);
}

#[test]
fn test_checksum_matches_crc32_ieee() {
    // Well-known CRC32 test vector
    assert_eq!(checksum(b"123456789"), 0xCBF4_3926);
    assert_eq!(checksum(b""), 0);
}
