//! Store Iterators
//!
//! Iteration over the live records of a store, in log order.

use crate::allocator::SizeClasses;
use crate::location::{Location, Position};
use crate::storage::FileManager;

use super::{ScanItem, Scanner};

/// Iterator over live records together with their handles
pub struct Entries<'a> {
    files: &'a FileManager,
    classes: &'a SizeClasses,
    scanner: Scanner,
}

impl<'a> Entries<'a> {
    pub(crate) fn new(files: &'a FileManager, classes: &'a SizeClasses, start: Position) -> Self {
        Self {
            files,
            classes,
            scanner: Scanner::new(start),
        }
    }
}

impl<'a> Iterator for Entries<'a> {
    /// (handle, key, value)
    type Item = (Location, Vec<u8>, Vec<u8>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.scanner.next_item(self.files, self.classes)? {
                ScanItem::Value {
                    location,
                    key,
                    value,
                } => return Some((location, key.to_vec(), value.to_vec())),
                ScanItem::Tombstone(_) | ScanItem::Padding { .. } => continue,
            }
        }
    }
}

/// Iterator over live (key, value) pairs
pub struct Iter<'a> {
    entries: Entries<'a>,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(entries: Entries<'a>) -> Self {
        Self { entries }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = (Vec<u8>, Vec<u8>);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next().map(|(_, key, value)| (key, value))
    }
}
