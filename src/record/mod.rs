//! Record Module
//!
//! Binary layout of everything written into a slot.
//!
//! ## Record Format
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │ Header (10 bytes)                                           │
//! │   Kind: u8 | SizeClass: u8 | TotalLen: u32 | KeyLen: u32    │
//! ├─────────────────────────────────────────────────────────────┤
//! │ Payload (Value records only)                                │
//! │   [Key bytes][Value bytes]                                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - `Value`: TotalLen = header + key + value (the natural length). The
//!   slot it lives in may be larger; the size class names the slot.
//! - `Tombstone`: TotalLen = slot capacity, KeyLen = 0.
//! - `Padding`: TotalLen = length of the unusable tail it covers.
//! - `Unwritten`: all-zero bytes, never written explicitly.
//!
//! All integers are little-endian.

mod codec;

pub use codec::{
    decode_header, decode_value, value_len, write_padding, write_tombstone, write_value,
};

/// Header size: Kind (1) + SizeClass (1) + TotalLen (4) + KeyLen (4) = 10 bytes
pub const HEADER_SIZE: usize = 10;

/// Kind tag stored in the first byte of every record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RecordKind {
    /// Zeroed space: nothing was ever written here
    Unwritten = 0,
    /// A live key/value pair
    Value = 1,
    /// A deleted record, keeps the full slot size
    Tombstone = 2,
    /// Unusable tail of a file
    Padding = 3,
}

impl RecordKind {
    pub fn from_u8(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(RecordKind::Unwritten),
            1 => Some(RecordKind::Value),
            2 => Some(RecordKind::Tombstone),
            3 => Some(RecordKind::Padding),
            _ => None,
        }
    }
}

/// Decoded fixed-size header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub kind: RecordKind,
    pub size_class: u8,
    pub total_len: u32,
    pub key_len: u32,
}

impl RecordHeader {
    /// Header of never-written space
    pub const UNWRITTEN: RecordHeader = RecordHeader {
        kind: RecordKind::Unwritten,
        size_class: 0,
        total_len: 0,
        key_len: 0,
    };
}
