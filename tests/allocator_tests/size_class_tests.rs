//! Tests for SizeClasses
//!
//! These tests verify:
//! - Every size fits in its class
//! - Classing is monotonic
//! - Oversize requests are rejected
//! - Invalid tables are rejected

use slabkv::allocator::SizeClasses;
use slabkv::StoreError;

#[test]
fn test_table_doubles() {
    let classes = SizeClasses::new(32, 1024).unwrap();

    assert_eq!(classes.len(), 6);
    assert_eq!(classes.smallest(), 32);
    assert_eq!(classes.largest(), 1024);
    for class in 0..6u8 {
        assert_eq!(classes.capacity(class), 32 << class);
    }
}

#[test]
fn test_class_boundaries() {
    let classes = SizeClasses::new(32, 1024).unwrap();

    assert_eq!(classes.class_of(0), Some(0));
    assert_eq!(classes.class_of(32), Some(0));
    assert_eq!(classes.class_of(33), Some(1));
    assert_eq!(classes.class_of(64), Some(1));
    assert_eq!(classes.class_of(65), Some(2));
    assert_eq!(classes.class_of(1024), Some(5));
    assert_eq!(classes.class_of(1025), None);
}

#[test]
fn test_capacity_covers_size_and_is_monotonic() {
    let classes = SizeClasses::new(16, 4096).unwrap();
    let mut previous = 0u8;

    for size in 0..=4096usize {
        let class = classes.class_of(size).unwrap();
        assert!(classes.capacity(class) as usize >= size, "size {}", size);
        assert!(class >= previous, "class_of not monotonic at {}", size);
        previous = class;
    }
}

#[test]
fn test_round() {
    let classes = SizeClasses::new(32, 1024).unwrap();

    assert_eq!(classes.round(12), Some(32));
    assert_eq!(classes.round(100), Some(128));
    assert_eq!(classes.round(2000), None);
}

#[test]
fn test_largest_fitting() {
    let classes = SizeClasses::new(32, 1024).unwrap();

    assert_eq!(classes.largest_fitting(31), None);
    assert_eq!(classes.largest_fitting(32), Some(0));
    assert_eq!(classes.largest_fitting(127), Some(1));
    assert_eq!(classes.largest_fitting(100_000), Some(5));
}

#[test]
fn test_contains() {
    let classes = SizeClasses::new(32, 1024).unwrap();

    assert!(classes.contains(5));
    assert!(!classes.contains(6));
}

#[test]
fn test_non_power_of_two_rejected() {
    let result = SizeClasses::new(48, 1024);
    assert!(matches!(result, Err(StoreError::Config(_))));

    let result = SizeClasses::new(32, 1000);
    assert!(matches!(result, Err(StoreError::Config(_))));
}

#[test]
fn test_min_smaller_than_header_rejected() {
    let result = SizeClasses::new(8, 1024);
    assert!(matches!(result, Err(StoreError::Config(_))));
}

#[test]
fn test_inverted_bounds_rejected() {
    let result = SizeClasses::new(1024, 32);
    assert!(matches!(result, Err(StoreError::Config(_))));
}

#[test]
fn test_single_class_table() {
    let classes = SizeClasses::new(64, 64).unwrap();

    assert_eq!(classes.len(), 1);
    assert_eq!(classes.class_of(1), Some(0));
    assert_eq!(classes.class_of(65), None);
}
