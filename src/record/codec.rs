//! Record Codec
//!
//! Encodes records straight into mapped slots and decodes them back.
//! Callers hand in a slice that is at least as long as the record.

use super::{RecordHeader, RecordKind, HEADER_SIZE};

/// Natural length of a value record (header + key + value)
pub fn value_len(key: &[u8], value: &[u8]) -> usize {
    HEADER_SIZE + key.len() + value.len()
}

/// Write a value record into `dst`, returns the number of bytes written
pub fn write_value(dst: &mut [u8], size_class: u8, key: &[u8], value: &[u8]) -> usize {
    let total = value_len(key, value);
    debug_assert!(dst.len() >= total, "slot too small for value record");

    write_header(dst, RecordKind::Value, size_class, total as u32, key.len() as u32);
    dst[HEADER_SIZE..HEADER_SIZE + key.len()].copy_from_slice(key);
    dst[HEADER_SIZE + key.len()..total].copy_from_slice(value);

    total
}

/// Write a tombstone covering a whole slot of `slot_capacity` bytes
pub fn write_tombstone(dst: &mut [u8], size_class: u8, slot_capacity: u32) {
    write_header(dst, RecordKind::Tombstone, size_class, slot_capacity, 0);
}

/// Write a padding record covering `len` bytes
pub fn write_padding(dst: &mut [u8], len: u32) {
    debug_assert!(len as usize >= HEADER_SIZE, "padding shorter than a header");
    write_header(dst, RecordKind::Padding, 0, len, 0);
}

/// Decode the fixed-size header.
///
/// Returns `None` when the kind byte is unknown. A slice shorter than a
/// header is treated as unwritten space.
pub fn decode_header(bytes: &[u8]) -> Option<RecordHeader> {
    if bytes.len() < HEADER_SIZE {
        return Some(RecordHeader::UNWRITTEN);
    }

    let kind = RecordKind::from_u8(bytes[0])?;
    let size_class = bytes[1];
    let total_len = u32::from_le_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]);
    let key_len = u32::from_le_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]);

    Some(RecordHeader {
        kind,
        size_class,
        total_len,
        key_len,
    })
}

/// Decode a full value record into borrowed key and value slices.
///
/// Returns `None` for any other record kind or when the lengths in the
/// header do not fit inside `bytes`.
pub fn decode_value(bytes: &[u8]) -> Option<(&[u8], &[u8])> {
    let header = decode_header(bytes)?;
    if header.kind != RecordKind::Value {
        return None;
    }

    let total = header.total_len as usize;
    let key_end = HEADER_SIZE.checked_add(header.key_len as usize)?;
    if total < key_end || total > bytes.len() {
        return None;
    }

    Some((&bytes[HEADER_SIZE..key_end], &bytes[key_end..total]))
}

fn write_header(dst: &mut [u8], kind: RecordKind, size_class: u8, total_len: u32, key_len: u32) {
    dst[0] = kind as u8;
    dst[1] = size_class;
    dst[2..6].copy_from_slice(&total_len.to_le_bytes());
    dst[6..10].copy_from_slice(&key_len.to_le_bytes());
}
