//! Recovery
//!
//! Rebuilds the allocator state of a reopened store from the raw log.
//! Free lists and the end cursor are never persisted; a full scan is the
//! only way to get them back.

use crate::allocator::Allocator;
use crate::location::Position;
use crate::storage::FileManager;

use super::{ScanItem, Scanner};

/// Result of a recovery pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryResult {
    /// Number of live value records found
    pub values: u64,

    /// Number of tombstones pushed back onto the free lists
    pub tombstones: u64,

    /// Number of padding records skipped
    pub padding: u64,

    /// End cursor after the pass
    pub end: Position,
}

/// Scan every file and restore the allocator.
///
/// This will:
/// 1. Walk the log from the start of file 0
/// 2. Push every tombstone onto the free list of its class
/// 3. Place the end cursor right after the last written record
pub fn recover(files: &FileManager, allocator: &mut Allocator) -> RecoveryResult {
    let mut scanner = Scanner::new(Position::START);
    let mut result = RecoveryResult {
        values: 0,
        tombstones: 0,
        padding: 0,
        end: Position::START,
    };

    while let Some(item) = scanner.next_item(files, allocator.classes()) {
        match item {
            ScanItem::Value { .. } => result.values += 1,
            ScanItem::Tombstone(location) => {
                allocator.release(location);
                result.tombstones += 1;
            }
            ScanItem::Padding { .. } => result.padding += 1,
        }
    }

    result.end = scanner.position();
    allocator.set_end(result.end);

    tracing::info!(
        "Recovery: {} values, {} free slots, {} padding records, end={}",
        result.values,
        result.tombstones,
        result.padding,
        result.end
    );

    result
}
