//! Tests for file rollover
//!
//! These tests verify:
//! - A new backing file is added once the current one is full
//! - The tail of the full file becomes free slots and padding
//! - Growing (non-preallocated) files roll over the same way

use slabkv::{Location, Position, Store};
use tempfile::TempDir;

use super::{init_tracing, reopen, setup_store, small_config, value_for_128};

fn fill_past_first_file(store: &mut Store) -> Vec<Location> {
    (0..32u32)
        .map(|i| {
            let key = format!("key{:02}", i);
            let value = value_for_128(key.as_bytes());
            store.insert(key.as_bytes(), &value).unwrap()
        })
        .collect()
}

#[test]
fn test_rollover_adds_file() {
    let (_temp, mut store) = setup_store();

    let handles = fill_past_first_file(&mut store);

    assert_eq!(store.file_count(), 2);
    assert!(handles[..31].iter().all(|h| h.file() == 0));
    assert_eq!(handles[31], Location::new(1, 1, 2));
    assert_eq!(store.end(), Position::new(1, 129));
}

#[test]
fn test_rollover_tail_goes_to_free_lists() {
    let (_temp, mut store) = setup_store();

    fill_past_first_file(&mut store);

    let stats = store.stats();
    assert_eq!(stats.free_slots, vec![1, 1, 0, 0, 0, 0]);
    assert!(store.is_free(Location::new(0, 3969, 1)));
    assert!(store.is_free(Location::new(0, 4033, 0)));
}

#[test]
fn test_rollover_tail_is_not_a_value() {
    let (_temp, mut store) = setup_store();

    fill_past_first_file(&mut store);

    assert_eq!(store.get(Location::new(0, 3969, 1)).unwrap(), None);
    assert_eq!(store.get(Location::new(0, 4033, 0)).unwrap(), None);
    assert!(!store.delete(Location::new(0, 4033, 0)).unwrap());
    assert_eq!(store.iter().count(), 32);
}

#[test]
fn test_tail_slot_reused() {
    let (_temp, mut store) = setup_store();

    fill_past_first_file(&mut store);
    let end = store.end();

    let small = store.insert(b"s", b"1").unwrap();
    let medium = store.insert(b"m", &[b'x'; 40]).unwrap();

    assert_eq!(small, Location::new(0, 4033, 0));
    assert_eq!(medium, Location::new(0, 3969, 1));
    assert_eq!(store.end(), end);
}

#[test]
fn test_rollover_without_preallocation() {
    init_tracing();
    let temp = TempDir::new().unwrap();
    let mut store = Store::open(small_config(&temp, false)).unwrap();
    assert_eq!(store.stats().mapped_bytes, 256);

    let handles = fill_past_first_file(&mut store);

    assert_eq!(handles[31], Location::new(1, 1, 2));
    // File 0 grew to capacity, file 1 starts small
    assert_eq!(store.stats().mapped_bytes, 4096 + 256);
    assert_eq!(store.stats().free_slots, vec![1, 1, 0, 0, 0, 0]);

    for handle in &handles {
        assert!(store.get(*handle).unwrap().is_some());
    }
}

#[test]
fn test_many_files() {
    let (temp, mut store) = setup_store();

    // Three 1024-byte slots per file
    let value = vec![b'z'; 1000];
    let handles: Vec<_> = (0..10)
        .map(|_| store.insert(b"big", &value).unwrap())
        .collect();

    assert_eq!(store.file_count(), 4);
    assert_eq!(handles[9], Location::new(3, 1, 5));
    store.close().unwrap();

    let store = reopen(&temp, true);
    assert_eq!(store.file_count(), 4);
    assert_eq!(store.end(), Position::new(3, 1025));
    assert_eq!(store.iter().count(), 10);
}
