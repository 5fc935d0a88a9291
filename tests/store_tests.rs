//! Tests for the volume store
//!
//! These tests verify:
//! - Volume registration and lookup
//! - Duplicate and missing volume errors
//! - End-to-end writes through a store-managed volume

use haystore::{HayError, Store, VolumeConfig};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_store() -> (TempDir, Store) {
    let temp_dir = TempDir::new().unwrap();
    let config = VolumeConfig::builder()
        .dir(temp_dir.path())
        .capacity(1 << 20)
        .build();
    (temp_dir, Store::new(config))
}

// =============================================================================
// Registry Tests
// =============================================================================

#[test]
fn test_create_and_get_volume() {
    let (_temp, store) = setup_store();

    let created = store.create_volume(1).unwrap();
    let fetched = store.volume(1).unwrap();
    assert_eq!(created.id(), fetched.id());
    assert_eq!(store.volume_count(), 1);
}

#[test]
fn test_duplicate_volume_id() {
    let (_temp, store) = setup_store();
    store.create_volume(1).unwrap();

    assert!(matches!(
        store.create_volume(1),
        Err(HayError::VolumeExists(1))
    ));
    assert_eq!(store.volume_count(), 1);
}

#[test]
fn test_missing_volume() {
    let (_temp, store) = setup_store();
    assert!(matches!(store.volume(9), Err(HayError::VolumeNotFound(9))));
}

#[test]
fn test_volumes_are_isolated() {
    let (_temp, store) = setup_store();
    let v1 = store.create_volume(1).unwrap();
    let v2 = store.create_volume(2).unwrap();

    v1.put(10, b"in volume one", "a.txt").unwrap();
    assert!(matches!(v2.get_needle(10), Err(HayError::NotFound(10))));
    assert_eq!(&v1.get_body(10).unwrap().0[..], b"in volume one");
}

// =============================================================================
// End-to-End Tests
// =============================================================================

#[test]
fn test_put_auto_through_store() {
    let (_temp, store) = setup_store();
    let volume = store.create_volume(1).unwrap();

    let id = volume.put_auto(b"store-managed", "s.dat").unwrap();
    let (body, ext) = volume.get_body(id).unwrap();
    assert_eq!(&body[..], b"store-managed");
    assert_eq!(ext, "dat");
}

#[test]
fn test_shared_id_generator_across_volumes() {
    let (_temp, store) = setup_store();
    let v1 = store.create_volume(1).unwrap();
    let v2 = store.create_volume(2).unwrap();

    let a = v1.put_auto(b"one", "a.txt").unwrap();
    let b = v2.put_auto(b"two", "b.txt").unwrap();
    assert_ne!(a, b);
}
