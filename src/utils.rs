//! Utility functions for decoding raw kernel buffers.

use crate::error::{InventoryError, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use encoding_rs::UTF_16LE;
use std::io::Cursor;

/// Decodes a UTF-16LE byte slice, trimming trailing null terminators.
///
/// # Errors
///
/// Returns an error if the data length is odd or the data is not valid UTF-16.
pub fn read_utf16_string(data: &[u8]) -> Result<String> {
    if data.is_empty() {
        return Ok(String::new());
    }

    if data.len() % 2 != 0 {
        return Err(InventoryError::InvalidKeyName(format!(
            "odd UTF-16 byte length {}",
            data.len()
        )));
    }

    let (decoded, had_errors) = UTF_16LE.decode_without_bom_handling(data);
    if had_errors {
        return Err(InventoryError::InvalidKeyName(
            "name is not valid UTF-16".to_string(),
        ));
    }

    Ok(decoded.trim_end_matches('\0').to_string())
}

/// Reads a little-endian u32 at the given offset.
pub fn read_u32_le(data: &[u8], offset: usize) -> Result<u32> {
    if offset + 4 > data.len() {
        return Err(InventoryError::InvalidKeyName(format!(
            "truncated at offset {}: expected 4 bytes, got {}",
            offset,
            data.len().saturating_sub(offset)
        )));
    }

    let mut cursor = Cursor::new(&data[offset..offset + 4]);
    Ok(cursor.read_u32::<LittleEndian>()?)
}
