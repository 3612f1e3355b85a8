//! Per-directory geometry and sample format
//!
//! A `DirectoryDescriptor` is extracted from each directory while walking
//! the stack. It carries what the strip decoder needs and is discarded once
//! the slice has been normalized.

use log::{debug, warn};
use std::fmt;

use crate::io::seekable::SeekableReader;
use crate::tiff::constants::{compression, tags};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;
use crate::tiff::reader::TiffReader;
use crate::utils::buffer_utils;

/// Supported sample bit widths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleWidth {
    /// 8-bit unsigned samples; 1-bit data is read as bytes too
    Eight,
    /// 16-bit unsigned samples
    Sixteen,
    /// IEEE float32 samples
    ThirtyTwo,
    /// IEEE float64 samples
    SixtyFour,
}

impl SampleWidth {
    /// Classifies a BitsPerSample value
    pub fn from_bits(bits: u16) -> TiffResult<Self> {
        match bits {
            1 | 8 => Ok(SampleWidth::Eight),
            16 => Ok(SampleWidth::Sixteen),
            32 => Ok(SampleWidth::ThirtyTwo),
            64 => Ok(SampleWidth::SixtyFour),
            _ => Err(TiffError::UnsupportedFormat(format!(
                "{} bits per sample (supported: 1, 8, 16, 32, 64)", bits))),
        }
    }

    /// Size of one native element in bytes
    pub fn bytes(&self) -> usize {
        match self {
            SampleWidth::Eight => 1,
            SampleWidth::Sixteen => 2,
            SampleWidth::ThirtyTwo => 4,
            SampleWidth::SixtyFour => 8,
        }
    }
}

/// Geometry and encoding of one directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryDescriptor {
    /// Directory index in the chain
    pub index: usize,
    /// ImageWidth as stored
    pub width: u64,
    /// ImageLength as stored
    pub height: u64,
    /// BitsPerSample (first value)
    pub bits_per_sample: u16,
    /// Channels used for decoding, always 1
    pub samples_per_pixel: u16,
    /// SamplesPerPixel as stored (1 when absent)
    pub declared_samples_per_pixel: u16,
    /// max(bits_per_sample / 8, 1)
    pub bytes_per_sample: usize,
    /// Rows in each strip, clamped to the image height
    pub rows_per_strip: u64,
    /// Compression code (1 when absent)
    pub compression: u64,
    /// Number of strips declared by StripOffsets
    pub strip_count: u64,
    /// Decoded size in bytes of one full strip
    pub strip_size: u64,
    /// strip_count * strip_size
    pub buffer_size: u64,
}

impl DirectoryDescriptor {
    /// Reads the geometry tags of `ifd`
    ///
    /// Width, length and bits-per-sample are required. A missing or
    /// multi-channel SamplesPerPixel is accepted with a warning and decoding
    /// proceeds as single channel.
    pub fn extract<R: SeekableReader>(reader: &mut TiffReader<R>, ifd: &IFD) -> TiffResult<Self> {
        let index = ifd.number;
        let width = required(reader, ifd, tags::IMAGE_WIDTH)?;
        let height = required(reader, ifd, tags::IMAGE_LENGTH)?;
        let bits = required(reader, ifd, tags::BITS_PER_SAMPLE)?;
        let bits_per_sample = u16::try_from(bits).map_err(|_| TiffError::UnsupportedFormat(format!(
            "directory {}: {} bits per sample", index, bits)))?;

        let declared = reader.read_tag_value(ifd, tags::SAMPLES_PER_PIXEL)?;
        if declared != Some(1) {
            warn!("Directory {}: undefined or unsupported samples per pixel ({:?}), reading as single channel",
                  index, declared);
        }
        let declared_samples_per_pixel = declared.unwrap_or(1).max(1) as u16;

        let rows_per_strip = match reader.read_tag_value(ifd, tags::ROWS_PER_STRIP)? {
            Some(rows) if rows > 0 => rows.min(height),
            _ => height,
        };
        let compression = reader.read_tag_value(ifd, tags::COMPRESSION)?
            .unwrap_or(compression::NONE as u64);
        let strip_count = ifd.get_entry(tags::STRIP_OFFSETS).map_or(0, |entry| entry.count);

        let row_bits = buffer_utils::checked_size(width, bits_per_sample as u64 * declared_samples_per_pixel as u64, "scanline")?;
        let scanline_bytes = row_bits.div_ceil(8);
        let strip_size = buffer_utils::checked_size(rows_per_strip, scanline_bytes, "strip")?;
        let buffer_size = buffer_utils::checked_size(strip_count, strip_size, "strip buffer")?;

        let descriptor = DirectoryDescriptor {
            index,
            width,
            height,
            bits_per_sample,
            samples_per_pixel: 1,
            declared_samples_per_pixel,
            bytes_per_sample: (bits_per_sample as usize / 8).max(1),
            rows_per_strip,
            compression,
            strip_count,
            strip_size,
            buffer_size,
        };
        debug!("{}", descriptor);

        Ok(descriptor)
    }

    /// Sample width class of this directory
    pub fn sample_width(&self) -> TiffResult<SampleWidth> {
        SampleWidth::from_bits(self.bits_per_sample)
    }

    /// Rows of the slice, at least 1
    pub fn rows(&self) -> usize {
        (self.height as usize).max(1)
    }

    /// Columns of the slice, at least 1
    pub fn cols(&self) -> usize {
        (self.width as usize).max(1)
    }

    /// Number of strips needed to cover every row of the slice
    ///
    /// Zero for degenerate slices with no rows or no columns.
    pub fn required_strip_count(&self) -> u64 {
        if self.width == 0 || self.height == 0 || self.rows_per_strip == 0 {
            return 0;
        }
        self.height.div_ceil(self.rows_per_strip)
    }

    /// Bytes of decoded data expected from strip `strip`
    ///
    /// Every strip holds `rows_per_strip` rows except the last, which holds
    /// whatever remains of the image.
    pub fn expected_strip_size(&self, strip: u64) -> u64 {
        if self.rows_per_strip == 0 {
            return 0;
        }
        let first_row = strip.saturating_mul(self.rows_per_strip);
        let rows = self.height.saturating_sub(first_row).min(self.rows_per_strip);
        rows * (self.strip_size / self.rows_per_strip)
    }
}

impl fmt::Display for DirectoryDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Directory {}: {}x{}, {} bits/sample, {} samples/pixel, {} strip(s) of {} bytes",
               self.index, self.width, self.height, self.bits_per_sample,
               self.declared_samples_per_pixel, self.strip_count, self.strip_size)
    }
}

/// Reads the first value of a tag that must be present
fn required<R: SeekableReader>(reader: &mut TiffReader<R>, ifd: &IFD, tag: u16) -> TiffResult<u64> {
    reader.read_tag_value(ifd, tag)?
        .ok_or(TiffError::MissingTag { directory: ifd.number, tag })
}
