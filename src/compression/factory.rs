//! Factory for creating compression handlers

use crate::tiff::constants::compression;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::utils::tag_utils;
use super::handler::CompressionHandler;
use super::uncompressed::UncompressedHandler;

/// Factory for creating compression handlers
pub struct CompressionFactory;

impl CompressionFactory {
    /// Create a compression handler for the given compression code
    pub fn create_handler(code: u64) -> TiffResult<Box<dyn CompressionHandler>> {
        match code {
            c if c == compression::NONE as u64 => Ok(Box::new(UncompressedHandler)),
            _ => Err(TiffError::UnsupportedFormat(format!(
                "compression {} ({}), only uncompressed strips are supported",
                code, tag_utils::get_compression_name(code)))),
        }
    }
}
