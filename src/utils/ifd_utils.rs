//! IFD utilities
//!
//! Utilities for locating Image File Directories (IFDs) in TIFF files.

use crate::io::seekable::SeekableReader;
use crate::io::byte_order::ByteOrderHandler;
use crate::tiff::errors::{TiffError, TiffResult};

/// Reads an IFD offset field (4 bytes classic, 8 bytes BigTIFF)
///
/// Used both for the first offset in the header and for the link that
/// follows the entries of every IFD. Zero means the chain ends.
pub fn read_ifd_offset(
    reader: &mut dyn SeekableReader,
    is_big_tiff: bool,
    byte_order_handler: &dyn ByteOrderHandler
) -> TiffResult<u64> {
    if is_big_tiff {
        byte_order_handler.read_u64(reader).map_err(TiffError::IoError)
    } else {
        byte_order_handler.read_u32(reader)
            .map(|v| v as u64)
            .map_err(TiffError::IoError)
    }
}

/// Reads the entry count at the start of an IFD
pub fn read_entry_count(
    reader: &mut dyn SeekableReader,
    is_big_tiff: bool,
    byte_order_handler: &dyn ByteOrderHandler
) -> TiffResult<u64> {
    if is_big_tiff {
        byte_order_handler.read_u64(reader).map_err(TiffError::IoError)
    } else {
        byte_order_handler.read_u16(reader)
            .map(|v| v as u64)
            .map_err(TiffError::IoError)
    }
}

/// Calculates the size of an IFD with `entry_count` entries in bytes
pub fn calculate_ifd_size(entry_count: u64, is_big_tiff: bool) -> u64 {
    if is_big_tiff {
        // 8 (entry count) + 20 (each entry) + 8 (next IFD offset)
        8 + (20 * entry_count) + 8
    } else {
        // 2 (entry count) + 12 (each entry) + 4 (next IFD offset)
        2 + (12 * entry_count) + 4
    }
}

#[cfg(test)]
mod tests {
    use super::calculate_ifd_size;

    #[test]
    fn ifd_size_matches_layout() {
        assert_eq!(calculate_ifd_size(0, false), 6);
        assert_eq!(calculate_ifd_size(10, false), 126);
        assert_eq!(calculate_ifd_size(10, true), 216);
    }
}
