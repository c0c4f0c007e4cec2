//! Size-Class Table
//!
//! Maps a requested byte size to the fixed slot capacity that holds it.
//! Capacities double from `min_slot_size` up to `max_slot_size`.

use crate::config::Config;
use crate::error::{Result, StoreError};
use crate::location::MAX_SIZE_CLASSES;
use crate::record::HEADER_SIZE;

/// Table of monotonically increasing slot capacities
#[derive(Debug, Clone)]
pub struct SizeClasses {
    /// log2 of the smallest capacity
    min_shift: u32,
    /// capacities[class] = min_slot_size << class
    capacities: Vec<u32>,
}

impl SizeClasses {
    /// Build the table for `[min_slot, max_slot]`.
    ///
    /// Both bounds must be powers of two and the smallest slot must be
    /// able to hold a record header (tombstones are header-only).
    pub fn new(min_slot: u32, max_slot: u32) -> Result<Self> {
        if !min_slot.is_power_of_two() || !max_slot.is_power_of_two() {
            return Err(StoreError::Config(format!(
                "slot sizes must be powers of two (min={}, max={})",
                min_slot, max_slot
            )));
        }

        if (min_slot as usize) < HEADER_SIZE {
            return Err(StoreError::Config(format!(
                "min_slot_size {} is smaller than the {}-byte record header",
                min_slot, HEADER_SIZE
            )));
        }

        if max_slot < min_slot {
            return Err(StoreError::Config(format!(
                "max_slot_size {} is smaller than min_slot_size {}",
                max_slot, min_slot
            )));
        }

        let min_shift = min_slot.trailing_zeros();
        let count = (max_slot.trailing_zeros() - min_shift + 1) as usize;
        debug_assert!(count <= MAX_SIZE_CLASSES);

        let capacities = (0..count).map(|class| min_slot << class).collect();

        Ok(Self {
            min_shift,
            capacities,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.min_slot_size, config.max_slot_size)
    }

    /// Smallest class whose capacity is at least `size`.
    ///
    /// Returns `None` when `size` is larger than the largest class.
    pub fn class_of(&self, size: usize) -> Option<u8> {
        if size > self.largest() as usize {
            return None;
        }

        let rounded = size.max(self.smallest() as usize).next_power_of_two();
        Some((rounded.trailing_zeros() - self.min_shift) as u8)
    }

    /// Slot capacity of `class`.
    ///
    /// # Panics
    /// If `class` is not part of this table; check with `contains` first
    /// when the class comes from untrusted bytes.
    pub fn capacity(&self, class: u8) -> u32 {
        self.capacities[class as usize]
    }

    /// `size` rounded up to its slot capacity
    pub fn round(&self, size: usize) -> Option<u32> {
        self.class_of(size).map(|class| self.capacity(class))
    }

    /// Largest class whose whole slot fits in `space` bytes
    pub fn largest_fitting(&self, space: u64) -> Option<u8> {
        self.capacities
            .iter()
            .rposition(|&capacity| u64::from(capacity) <= space)
            .map(|class| class as u8)
    }

    pub fn contains(&self, class: u8) -> bool {
        (class as usize) < self.capacities.len()
    }

    pub fn smallest(&self) -> u32 {
        self.capacities[0]
    }

    pub fn largest(&self) -> u32 {
        self.capacities[self.capacities.len() - 1]
    }

    /// Number of classes
    pub fn len(&self) -> usize {
        self.capacities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capacities.is_empty()
    }
}
