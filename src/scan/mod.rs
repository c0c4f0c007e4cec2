//! Scan Module
//!
//! Sequential traversal of every record in every backing file.
//!
//! ## Responsibilities
//! - Walk the log from the store's start position
//! - Skip padding, tombstones and whole slots
//! - Serve user iteration over live records
//! - Rebuild free lists and the end cursor after a restart
//!
//! ## Walk Rules
//! ```text
//! offset + header > capacity  → next file at offset 1 (stop if none)
//! Unwritten / unmapped        → stop, this is the end of the data
//! Padding                     → skip total_len bytes
//! Tombstone                   → skip the slot, report its location
//! Value                       → skip the slot, report key/value
//! ```

mod iterator;
mod recovery;

pub use iterator::{Entries, Iter};
pub use recovery::{recover, RecoveryResult};

use crate::allocator::SizeClasses;
use crate::location::{Location, Position};
use crate::record::{self, RecordKind, HEADER_SIZE};
use crate::storage::FileManager;

/// A record met by the scanner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanItem<'a> {
    /// A live key/value pair, borrowed from the mapping
    Value {
        location: Location,
        key: &'a [u8],
        value: &'a [u8],
    },

    /// A vacated slot
    Tombstone(Location),

    /// An unusable stretch at `position` of `len` bytes
    Padding { position: Position, len: u32 },
}

/// Cursor over the raw log
///
/// The scanner holds no borrow of the store; callers pass the files and
/// the size-class table on every step.
#[derive(Debug, Clone)]
pub struct Scanner {
    position: Position,
    done: bool,
}

impl Scanner {
    /// Start a scan at `start`
    pub fn new(start: Position) -> Self {
        Self {
            position: start,
            done: false,
        }
    }

    /// Where the scan currently stands. Once the scan is finished this is
    /// the first byte after the written data.
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Advance to the next record, `None` once the written data ends
    pub fn next_item<'a>(
        &mut self,
        files: &'a FileManager,
        classes: &SizeClasses,
    ) -> Option<ScanItem<'a>> {
        while !self.done {
            let Position { file, offset } = self.position;

            // Too close to the end of the file for another header
            if u64::from(offset) + HEADER_SIZE as u64 > files.capacity() {
                if (file as usize + 1) < files.file_count() {
                    self.position = Position::file_start(file + 1);
                    continue;
                }
                return self.finish();
            }

            let bytes = files.bytes_at(file, u64::from(offset), HEADER_SIZE);
            let Some(header) = record::decode_header(bytes) else {
                tracing::warn!("Unknown record kind at {}, ending scan", self.position);
                return self.finish();
            };

            match header.kind {
                RecordKind::Unwritten => return self.finish(),

                RecordKind::Padding => {
                    let len = u64::from(header.total_len);
                    if len < HEADER_SIZE as u64 || u64::from(offset) + len > files.capacity() {
                        tracing::warn!("Malformed padding at {}, ending scan", self.position);
                        return self.finish();
                    }
                    let position = self.position;
                    self.position.offset += header.total_len;
                    return Some(ScanItem::Padding {
                        position,
                        len: header.total_len,
                    });
                }

                RecordKind::Tombstone | RecordKind::Value => {
                    if !classes.contains(header.size_class) {
                        tracing::warn!(
                            "Size class {} out of range at {}, ending scan",
                            header.size_class,
                            self.position
                        );
                        return self.finish();
                    }

                    let capacity = classes.capacity(header.size_class);
                    if u64::from(offset) + u64::from(capacity) > files.capacity() {
                        tracing::warn!("Slot at {} runs past the file end, ending scan", self.position);
                        return self.finish();
                    }

                    let location = self.position.with_class(header.size_class);
                    self.position.offset += capacity;

                    if header.kind == RecordKind::Tombstone {
                        return Some(ScanItem::Tombstone(location));
                    }

                    let bytes = files.bytes_at(file, u64::from(offset), header.total_len as usize);
                    match record::decode_value(bytes) {
                        Some((key, value)) => {
                            return Some(ScanItem::Value {
                                location,
                                key,
                                value,
                            })
                        }
                        None => {
                            tracing::warn!("Malformed value record at {}, ending scan", location);
                            self.position = location.position();
                            return self.finish();
                        }
                    }
                }
            }
        }

        None
    }

    fn finish<'a>(&mut self) -> Option<ScanItem<'a>> {
        self.done = true;
        None
    }
}
