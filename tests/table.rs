// Table<K, V> integration tests.
//
// The typed facade views keys and values as their raw bytes. These tests
// cover the same contract as the byte-level suite from the caller's side:
// round-trip, overwrite, delete, cursor passes, and derived Pod types.
mod common;

use bytemuck::{Pod, Zeroable};
use chain_table::{Cursor, SetOutcome, Table, TableConfig};
use common::init_test_logger;
use std::collections::BTreeSet;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Pod, Zeroable)]
#[repr(C)]
struct Point {
    x: i32,
    y: i32,
}

#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
struct Stats {
    hits: u64,
    ratio: f64,
}

// Test: a 4-byte string key with typed access.
#[test]
fn user_maps_to_42() {
    init_test_logger();
    let mut t: Table<[u8; 4], i32> = Table::new();
    t.set(b"user", 42);
    assert_eq!(t.get(b"user"), 42);
    assert!(t.exists(b"user"));
    assert!(!t.exists(b"usr\0"));
}

// Test: struct keys and values.
// Verifies: round-trip and overwrite with derived Pod types.
#[test]
fn struct_keys_and_values() {
    init_test_logger();
    let mut t: Table<Point, Stats> = Table::new();
    let p = Point { x: 3, y: -4 };
    let s1 = Stats { hits: 1, ratio: 0.5 };
    let s2 = Stats { hits: 2, ratio: 0.25 };
    assert_eq!(t.set(&p, s1), SetOutcome::Inserted);
    assert_eq!(t.set(&p, s2), SetOutcome::Updated);
    assert_eq!(t.len(), 1);
    assert_eq!(t.get(&p), s2);
    assert_eq!(t.try_get(&Point { x: 4, y: -3 }), None);
}

// Test: update applies in place.
#[test]
fn update_counts_hits() {
    init_test_logger();
    let mut t: Table<Point, Stats> = Table::new();
    let p = Point { x: 0, y: 0 };
    t.set(&p, Stats { hits: 0, ratio: 1.0 });
    for _ in 0..5 {
        assert!(t.update(&p, |s| s.hits += 1));
    }
    assert_eq!(t.get(&p).hits, 5);
}

// Test: typed cursor pass and borrowing iterator agree.
// Verifies: each key appears once; next stays None after exhaustion.
#[test]
fn cursor_and_iter_cover_all_entries() {
    init_test_logger();
    let mut t: Table<u32, u32> = Table::with_config(TableConfig::new().with_capacity(13));
    for n in 0..200u32 {
        t.set(&n, n * n);
    }
    let from_iter: Vec<(u32, u32)> = t.iter().collect();
    assert_eq!(from_iter.len(), 200);

    t.rewind();
    let mut from_cursor = Vec::new();
    while let Some(e) = t.next_entry() {
        from_cursor.push(e);
    }
    assert_eq!(from_iter, from_cursor);
    assert!(t.next().is_none());

    let keys: BTreeSet<u32> = from_cursor.iter().map(|&(k, _)| k).collect();
    assert_eq!(keys, (0..200).collect::<BTreeSet<u32>>());
    assert!(from_cursor.iter().all(|&(k, v)| v == k * k));
}

// Test: delete and remove through the typed API.
#[test]
fn delete_and_remove() {
    init_test_logger();
    let mut t: Table<u64, i16> = Table::new();
    t.set(&10, -1);
    t.set(&20, -2);
    assert!(t.delete(&10));
    assert!(!t.delete(&10));
    assert_eq!(t.remove(&20), Some(-2));
    assert!(t.is_empty());
    t.set(&10, 7);
    assert_eq!(t.get(&10), 7);
    t.clear();
    assert_eq!(t.try_get(&10), None);
}

// Test: keys are compared by bytes.
// Verifies: 0.0 and -0.0 are distinct float keys.
#[test]
fn float_keys_compare_by_bytes() {
    let mut t: Table<f32, u8> = Table::new();
    t.set(&0.0, 1);
    t.set(&-0.0, 2);
    assert_eq!(t.len(), 2);
    assert_eq!(t.get(&0.0), 1);
    assert_eq!(t.get(&-0.0), 2);
}

#[test]
#[should_panic(expected = "not found in table")]
fn get_missing_panics() {
    let t: Table<u32, u32> = Table::new();
    let _ = t.get(&1);
}

#[test]
fn try_with_config_reports_invalid_capacity() {
    assert!(Table::<u8, u8>::try_with_config(TableConfig::new().with_capacity(0)).is_err());
    let t = Table::<u8, u8>::try_with_config(TableConfig::new().with_capacity(2)).unwrap();
    assert_eq!(t.capacity(), 2);
}

// Test: recoverable set and cursor coordinates through the typed API.
// Assumes: a single bucket, so the chain is the whole table.
// Verifies: try_set reports Inserted then Updated; the cursor counts
// positions within the bucket and moves past the end once exhausted.
#[test]
fn try_set_and_cursor_coordinates() {
    init_test_logger();
    let mut t: Table<u16, u32> = Table::with_config(TableConfig::new().with_capacity(1));
    assert_eq!(t.try_set(&1, 10), Ok(SetOutcome::Inserted));
    assert_eq!(t.try_set(&2, 20), Ok(SetOutcome::Inserted));
    assert_eq!(t.try_set(&1, 11), Ok(SetOutcome::Updated));
    assert_eq!(t.get(&1), 11);
    assert_eq!(t.bucket_of(&1), 0);
    assert_eq!(t.bucket_of(&2), t.as_bytes().bucket_of(&2u16.to_ne_bytes()));

    t.rewind();
    assert_eq!(t.cursor(), Cursor { bucket: 0, position: 0 });
    assert_eq!(t.next_entry(), Some((2, 20)));
    assert_eq!(t.cursor(), Cursor { bucket: 0, position: 1 });
    assert_eq!(t.next_entry(), Some((1, 11)));
    assert_eq!(t.next_entry(), None);
    assert_eq!(t.cursor().bucket, t.capacity());
    t.destroy();
}
