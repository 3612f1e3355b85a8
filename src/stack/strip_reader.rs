//! Strip-based slice decoding
//!
//! A slice is the concatenation of its directory's strips. Every strip is
//! decompressed and decoded, in index order, into one contiguous scratch
//! buffer of native samples spanning the whole slice. The scratch buffer is
//! then normalized into the float32 output.

use log::{debug, trace, warn};

use crate::compression::{CompressionFactory, CompressionHandler};
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::tags;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;
use crate::tiff::reader::TiffReader;
use crate::tiff::validation;
use crate::utils::buffer_utils;

use super::descriptor::{DirectoryDescriptor, SampleWidth};
use super::normalizer::{self, NativeSample};

/// Checks that a directory uses a layout the decoder supports
///
/// Returns the compression handler for its strips. Tiled layouts and any
/// compression other than none are `UnsupportedFormat`. Declaring fewer
/// strips than the rows need is a `StripDecodeError` at the first missing
/// strip.
pub fn check_layout(ifd: &IFD, descriptor: &DirectoryDescriptor) -> TiffResult<Box<dyn CompressionHandler>> {
    if ifd.has_tag(tags::TILE_WIDTH) || ifd.has_tag(tags::TILE_OFFSETS) {
        return Err(TiffError::UnsupportedFormat(format!(
            "directory {} uses a tiled layout, only strips are supported", descriptor.index)));
    }
    descriptor.sample_width()?;

    let required = descriptor.required_strip_count();
    if descriptor.strip_count < required {
        return Err(TiffError::StripDecodeError {
            directory: descriptor.index,
            strip: descriptor.strip_count as usize,
            reason: format!("{} rows in strips of {} need {} strips, {} declared",
                            descriptor.height, descriptor.rows_per_strip, required, descriptor.strip_count),
        });
    }
    CompressionFactory::create_handler(descriptor.compression)
}

/// Decodes the strips of one directory
pub struct StripReader<'a, R: SeekableReader> {
    /// Reader positioned anywhere in the container
    reader: &'a mut TiffReader<R>,
    /// Directory holding the strip tags
    ifd: &'a IFD,
    /// Geometry extracted from `ifd`
    descriptor: &'a DirectoryDescriptor,
}

impl<'a, R: SeekableReader> StripReader<'a, R> {
    pub fn new(reader: &'a mut TiffReader<R>, ifd: &'a IFD, descriptor: &'a DirectoryDescriptor) -> Self {
        StripReader { reader, ifd, descriptor }
    }

    /// Decodes the slice into `out`, which holds exactly rows*cols samples
    pub fn read_slice(&mut self, out: &mut [f32]) -> TiffResult<()> {
        match self.descriptor.sample_width()? {
            SampleWidth::Eight => self.decode::<u8>(out),
            SampleWidth::Sixteen => self.decode::<u16>(out),
            SampleWidth::ThirtyTwo => self.decode::<f32>(out),
            SampleWidth::SixtyFour => self.decode::<f64>(out),
        }
    }

    /// Decodes every strip into a native scratch buffer, then normalizes it
    fn decode<T: NativeSample>(&mut self, out: &mut [f32]) -> TiffResult<()> {
        let descriptor = self.descriptor;
        let handler = check_layout(self.ifd, descriptor)?;
        debug!("Directory {}: decoding {} strip(s), compression {}",
               descriptor.index, descriptor.strip_count, handler.name());

        let offsets = self.reader.read_tag_values(self.ifd, tags::STRIP_OFFSETS)?;
        let byte_counts = self.reader.read_tag_values(self.ifd, tags::STRIP_BYTE_COUNTS)?;
        if byte_counts.len() < offsets.len() {
            return Err(self.strip_error(byte_counts.len(), format!(
                "{} strip offsets but only {} byte counts", offsets.len(), byte_counts.len())));
        }

        let buffered = usize::try_from(descriptor.buffer_size / descriptor.bytes_per_sample as u64)
            .map_err(|_| TiffError::AllocationError(format!(
                "strip buffer of {} bytes exceeds the address space", descriptor.buffer_size)))?;
        let mut scratch: Vec<T> = buffer_utils::try_alloc(buffered.max(out.len()), "strip scratch buffer")?;

        let mut sample_offset = 0usize;
        for (strip, (&offset, &byte_count)) in offsets.iter().zip(&byte_counts).enumerate() {
            let data = self.read_strip(strip, offset, byte_count, handler.as_ref())?;

            let count = data.len() / T::WIDTH;
            let end = sample_offset + count;
            if end > scratch.len() {
                return Err(self.strip_error(strip, format!(
                    "strip data overruns the slice buffer ({} > {} samples)", end, scratch.len())));
            }
            T::decode(self.reader.byte_order(), &data[..count * T::WIDTH], &mut scratch[sample_offset..end]);
            sample_offset = end;
        }
        trace!("Directory {}: decoded {} samples", descriptor.index, sample_offset);

        normalizer::normalize(&scratch, out);
        Ok(())
    }

    /// Reads and decompresses strip `strip` to its expected decoded size
    fn read_strip(
        &mut self,
        strip: usize,
        offset: u64,
        byte_count: u64,
        handler: &dyn CompressionHandler
    ) -> TiffResult<Vec<u8>> {
        let expected = self.descriptor.expected_strip_size(strip as u64);
        debug!("Reading strip {} at offset {} with {} bytes (expected {})",
               strip, offset, byte_count, expected);

        if !validation::validate_data_range(offset, byte_count, self.reader.file_size()) {
            return Err(self.strip_error(strip, format!(
                "{} bytes at offset {} exceed file size {}", byte_count, offset, self.reader.file_size())));
        }
        if byte_count < expected {
            return Err(self.strip_error(strip, format!(
                "short strip: {} bytes, expected {}", byte_count, expected)));
        }
        if byte_count > expected {
            warn!("Directory {} strip {}: ignoring {} bytes past the expected {}",
                  self.descriptor.index, strip, byte_count - expected, expected);
        }

        let mut raw: Vec<u8> = buffer_utils::try_alloc(byte_count as usize, "strip")?;
        if let Err(e) = self.reader.read_bytes_at(offset, &mut raw) {
            return Err(self.strip_error(strip, e.to_string()));
        }

        handler.decompress(&raw, expected as usize)
            .map_err(|e| self.strip_error(strip, e.to_string()))
    }

    fn strip_error(&self, strip: usize, reason: String) -> TiffError {
        TiffError::StripDecodeError {
            directory: self.descriptor.index,
            strip,
            reason,
        }
    }
}
