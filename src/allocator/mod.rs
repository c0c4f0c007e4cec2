//! Allocator Module
//!
//! Slab-style space management over the backing files.
//!
//! ## Responsibilities
//! - Round record sizes up to a size class
//! - Reuse vacated slots of the same class (O(1) pop)
//! - Otherwise append at the end cursor, rolling over to a new file
//!   when the current one cannot hold the slot
//! - Reclaim the unused tail of a filled file
//!
//! ## Rollover
//! ```text
//!  file N                                       capacity
//! ┌────────────────────────────┬────────┬────┬──┬──┐
//! │ allocated slots ...        │ tomb   │tomb│pd│  │  → file N+1, offset 1
//! └────────────────────────────┴────────┴────┴──┴──┘
//!                      end ────┘  free lists   │  └ shorter than a header
//!                                              └ padding
//! ```

mod free_list;
mod size_class;

pub use free_list::FreeLists;
pub use size_class::SizeClasses;

use crate::error::{Result, StoreError};
use crate::location::{Location, Position};
use crate::record::{self, HEADER_SIZE};
use crate::storage::FileManager;

/// Size-classed allocator with per-class free lists and an append cursor
#[derive(Debug, Clone)]
pub struct Allocator {
    /// Slot capacities
    classes: SizeClasses,

    /// Vacated slots, one stack per class
    free: FreeLists,

    /// First byte after the last appended slot
    end: Position,
}

impl Allocator {
    /// Create an allocator for an empty store
    pub fn new(classes: SizeClasses) -> Self {
        let free = FreeLists::new(classes.len());
        Self {
            classes,
            free,
            end: Position::START,
        }
    }

    /// Size class for a record of `size` bytes
    pub fn class_for(&self, size: usize) -> Result<u8> {
        self.classes
            .class_of(size)
            .ok_or(StoreError::RecordTooLarge {
                size,
                max: self.classes.largest(),
            })
    }

    /// Find a slot for a record of `size` bytes
    ///
    /// Steps:
    /// 1. Pick the size class
    /// 2. Pop a free slot of that class if one exists
    /// 3. Otherwise append at the end cursor (may roll over to a new file)
    pub fn allocate(&mut self, files: &mut FileManager, size: usize) -> Result<Location> {
        let class = self.class_for(size)?;

        if let Some(location) = self.free.pop(class) {
            tracing::trace!("Reusing free slot {}", location);
            return Ok(location);
        }

        self.append(files, class)
    }

    /// Return a slot to the free list of its class
    pub fn release(&mut self, location: Location) {
        self.free.push(location);
    }

    /// Get the append cursor
    pub fn end(&self) -> Position {
        self.end
    }

    /// Get the size-class table
    pub fn classes(&self) -> &SizeClasses {
        &self.classes
    }

    /// Get the free lists
    pub fn free_lists(&self) -> &FreeLists {
        &self.free
    }

    /// Move the append cursor (used by recovery)
    pub(crate) fn set_end(&mut self, end: Position) {
        self.end = end;
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Carve a new slot of `class` at the end cursor
    fn append(&mut self, files: &mut FileManager, class: u8) -> Result<Location> {
        let capacity = u64::from(self.classes.capacity(class));

        if u64::from(self.end.offset) + capacity > files.capacity() {
            self.roll_over(files)?;
        }

        let location = self.end.with_class(class);
        let slot_end = u64::from(self.end.offset) + capacity;

        files.reserve(self.end.file, slot_end)?;
        self.end.offset = slot_end as u32;

        Ok(location)
    }

    /// Close the current file and continue at offset 1 of the next one
    fn roll_over(&mut self, files: &mut FileManager) -> Result<()> {
        let file = self.end.file;
        let capacity = files.capacity();
        let tail = u64::from(self.end.offset);

        if tail < capacity {
            files.reserve(file, capacity)?;
            self.reclaim_tail(files, file, tail, capacity)?;

            // The tail is accounted for even if creating the next file fails
            self.end.offset = capacity as u32;
        }

        let next = file + 1;
        let next = if (next as usize) < files.file_count() {
            next
        } else {
            files.grow()?
        };

        tracing::debug!("Rolled over from file {} to file {}", file, next);
        self.end = Position::file_start(next);
        Ok(())
    }

    /// Turn `[start, end)` of `file` into free slots plus trailing padding
    ///
    /// The tail is split greedily into the largest slots that fit. Each is
    /// marked with a tombstone so a recovery scan finds it again. What is
    /// left is covered by a padding record when a header fits, and left
    /// unwritten otherwise.
    fn reclaim_tail(
        &mut self,
        files: &mut FileManager,
        file: u32,
        start: u64,
        end: u64,
    ) -> Result<()> {
        let mut offset = start;

        while let Some(class) = self.classes.largest_fitting(end - offset) {
            let capacity = self.classes.capacity(class);
            let location = Location::new(file, offset as u32, class);

            let slot = files.slot_mut(location, HEADER_SIZE)?;
            record::write_tombstone(slot, class, capacity);
            self.free.push(location);

            offset += u64::from(capacity);
        }

        let rest = end - offset;
        if rest >= HEADER_SIZE as u64 {
            let location = Location::new(file, offset as u32, 0);
            let slot = files.slot_mut(location, HEADER_SIZE)?;
            record::write_padding(slot, rest as u32);
        }

        Ok(())
    }
}
