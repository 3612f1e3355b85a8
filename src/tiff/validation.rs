//! TIFF validation utilities
//!
//! Validation functions that keep malformed files from sending the
//! reader off the end of the file or into huge allocations.

use log::{debug, error, warn};
use std::io::SeekFrom;

use crate::io::seekable::SeekableReader;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::io::byte_order::ByteOrderHandler;
use crate::tiff::constants::header;

/// Validates the first IFD offset to ensure it's within the file
pub fn validate_ifd_offset(offset: u64, file_size: u64) -> TiffResult<()> {
    if offset >= file_size || offset < header::TIFF_HEADER_SIZE {
        error!("Invalid first IFD offset: {} (file size: {})", offset, file_size);
        return Err(TiffError::InvalidHeader);
    }

    Ok(())
}

/// Checks a chained IFD offset, returning 0 (end of chain) when it is unusable
pub fn sanitize_next_offset(offset: u64, file_size: u64) -> u64 {
    if offset != 0 && (offset >= file_size || offset < header::TIFF_HEADER_SIZE) {
        warn!("Invalid next IFD offset: {} (file size: {}), stopping IFD chain", offset, file_size);
        return 0;
    }
    offset
}

/// Checks that `len` bytes starting at `offset` lie inside the file
pub fn validate_data_range(offset: u64, len: u64, file_size: u64) -> bool {
    offset.checked_add(len).map_or(false, |end| end <= file_size)
}

/// Gets the file size, restoring the current position afterwards
///
/// Returns u64::MAX if the size couldn't be determined
pub fn get_file_size(reader: &mut dyn SeekableReader) -> TiffResult<u64> {
    let current_position = reader.stream_position()?;
    let file_size = match reader.seek(SeekFrom::End(0)) {
        Ok(size) => size,
        Err(e) => {
            warn!("Could not determine file size: {}", e);
            u64::MAX
        }
    };
    reader.seek(SeekFrom::Start(current_position))?;

    Ok(file_size)
}

/// Validates the BigTIFF header
///
/// After the version number (43) BigTIFF stores the offset size (8)
/// and a reserved zero word.
pub fn validate_bigtiff_header(
    reader: &mut dyn SeekableReader,
    byte_order_handler: &dyn ByteOrderHandler
) -> TiffResult<()> {
    let offset_size = byte_order_handler.read_u16(reader)?;
    let zeros = byte_order_handler.read_u16(reader)?;

    debug!("BigTIFF offset size: {}, reserved: {}", offset_size, zeros);

    if offset_size != header::BIGTIFF_OFFSET_SIZE || zeros != 0 {
        error!("Invalid BigTIFF header: offset_size={}, zeros={}", offset_size, zeros);
        return Err(TiffError::InvalidBigTIFFHeader);
    }

    Ok(())
}
