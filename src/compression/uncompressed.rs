//! Handler for uncompressed data

use crate::tiff::constants::compression;
use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::CompressionHandler;

/// Uncompressed data handler (compression code 1)
pub struct UncompressedHandler;

impl CompressionHandler for UncompressedHandler {
    fn decompress(&self, data: &[u8], expected_len: usize) -> TiffResult<Vec<u8>> {
        if data.len() < expected_len {
            return Err(TiffError::GenericError(format!(
                "got {} bytes, expected {}", data.len(), expected_len)));
        }
        Ok(data[..expected_len].to_vec())
    }

    fn compress(&self, data: &[u8]) -> TiffResult<Vec<u8>> {
        Ok(data.to_vec())
    }

    fn name(&self) -> &'static str {
        "Uncompressed"
    }

    fn code(&self) -> u16 {
        compression::NONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_to_expected_length() {
        let data = [1u8, 2, 3, 4, 5];
        assert_eq!(UncompressedHandler.decompress(&data, 3).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn rejects_short_strip() {
        assert!(UncompressedHandler.decompress(&[1u8, 2], 4).is_err());
    }
}
