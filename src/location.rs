//! Location Codec
//!
//! A `Location` is the opaque 64-bit handle returned to callers and, at the
//! same time, the physical address of a record.
//!
//! ## Bit Layout
//! ```text
//! ┌────────────────┬──────────────────────┬──────────────────────────────┐
//! │ size class (8) │   file index (24)    │        byte offset (32)      │
//! └────────────────┴──────────────────────┴──────────────────────────────┘
//!  63            56 55                  32 31                            0
//! ```

use std::fmt;

/// Bits used by the byte offset
pub const OFFSET_BITS: u32 = 32;

/// Bits used by the file index
pub const FILE_BITS: u32 = 24;

/// Bits used by the size class
pub const CLASS_BITS: u32 = 8;

/// Number of backing files a store can address
pub const MAX_FILES: u64 = 1 << FILE_BITS;

/// Largest per-file capacity whose offsets still fit the offset field
pub const MAX_FILE_CAPACITY: u64 = u32::MAX as u64;

/// Number of size classes a handle can name
pub const MAX_SIZE_CLASSES: usize = 1 << CLASS_BITS;

const OFFSET_MASK: u64 = (1 << OFFSET_BITS) - 1;
const FILE_MASK: u64 = (1 << FILE_BITS) - 1;

/// Packed (file index, byte offset, size class) triple
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location(u64);

impl Location {
    /// Pack a triple.
    ///
    /// # Panics
    /// If `file` does not fit in the 24-bit file field.
    pub fn new(file: u32, offset: u32, size_class: u8) -> Self {
        assert!(
            u64::from(file) < MAX_FILES,
            "file index {} exceeds {} bits",
            file,
            FILE_BITS
        );

        Self(
            (u64::from(size_class) << (OFFSET_BITS + FILE_BITS))
                | (u64::from(file) << OFFSET_BITS)
                | u64::from(offset),
        )
    }

    /// Rebuild a location from a value previously produced by `into_raw`
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn into_raw(self) -> u64 {
        self.0
    }

    pub const fn file(self) -> u32 {
        ((self.0 >> OFFSET_BITS) & FILE_MASK) as u32
    }

    pub const fn offset(self) -> u32 {
        (self.0 & OFFSET_MASK) as u32
    }

    pub const fn size_class(self) -> u8 {
        (self.0 >> (OFFSET_BITS + FILE_BITS)) as u8
    }

    /// The (file, offset) part without the size class
    pub const fn position(self) -> Position {
        Position {
            file: self.file(),
            offset: self.offset(),
        }
    }

    /// Offset 0 is reserved in every file and never handed out
    pub const fn is_valid(self) -> bool {
        self.offset() != 0
    }
}

impl From<Location> for u64 {
    fn from(location: Location) -> u64 {
        location.into_raw()
    }
}

impl From<u64> for Location {
    fn from(raw: u64) -> Location {
        Location::from_raw(raw)
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Location")
            .field("file", &self.file())
            .field("offset", &self.offset())
            .field("size_class", &self.size_class())
            .finish()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}/{}", self.file(), self.offset(), self.size_class())
    }
}

/// A (file, offset) cursor, used for the append and scan positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub file: u32,
    pub offset: u32,
}

impl Position {
    /// First allocatable byte of the store
    pub const START: Position = Position { file: 0, offset: 1 };

    pub const fn new(file: u32, offset: u32) -> Self {
        Self { file, offset }
    }

    /// First allocatable byte of a given file
    pub const fn file_start(file: u32) -> Self {
        Self { file, offset: 1 }
    }

    /// Attach a size class, producing a handle for the slot at this position
    pub fn with_class(self, size_class: u8) -> Location {
        Location::new(self.file, self.offset, size_class)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.offset)
    }
}

/// The record identifier handed to callers; it is the record's location
pub type Handle = Location;
