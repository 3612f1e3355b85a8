//! Basic TIFF tag strategies
//!
//! Adds the fixed tag set every written slice carries: dimensions,
//! single-channel IEEE float samples, no compression, one strip.

use std::collections::BTreeMap;

use crate::tiff::ifd::{IFD, IFDEntry};
use crate::tiff::constants::{tags, field_types, photometric, compression, planar_config, sample_format};
use log::debug;

/// Adds basic TIFF tags to an IFD
pub struct BasicTagsBuilder;

impl BasicTagsBuilder {
    /// Add the tags of a 32-bit float grayscale image
    pub fn add_float_gray_tags(ifd: &mut IFD, width: u32, height: u32) {
        debug!("Adding float32 grayscale tags for {}x{} image", width, height);

        ifd.add_entry(IFDEntry::new(
            tags::IMAGE_WIDTH,
            field_types::LONG,
            1,
            width as u64)
        );

        ifd.add_entry(IFDEntry::new(
            tags::IMAGE_LENGTH,
            field_types::LONG,
            1,
            height as u64)
        );

        ifd.add_entry(IFDEntry::new(
            tags::BITS_PER_SAMPLE,
            field_types::SHORT,
            1,
            32)
        );

        ifd.add_entry(IFDEntry::new(
            tags::COMPRESSION,
            field_types::SHORT,
            1,
            compression::NONE as u64)
        );

        // BlackIsZero: minimum value is black
        ifd.add_entry(IFDEntry::new(
            tags::PHOTOMETRIC_INTERPRETATION,
            field_types::SHORT,
            1,
            photometric::BLACK_IS_ZERO as u64)
        );

        ifd.add_entry(IFDEntry::new(
            tags::SAMPLES_PER_PIXEL,
            field_types::SHORT,
            1,
            1)
        );

        ifd.add_entry(IFDEntry::new(
            tags::PLANAR_CONFIGURATION,
            field_types::SHORT,
            1,
            planar_config::CHUNKY as u64)
        );

        ifd.add_entry(IFDEntry::new(
            tags::SAMPLE_FORMAT,
            field_types::SHORT,
            1,
            sample_format::IEEEFP as u64)
        );
    }

    /// Setup single strip for an IFD
    ///
    /// RowsPerStrip equals the image height so the whole slice is one strip.
    /// StripOffsets is a placeholder until the writer lays out the file.
    pub fn setup_single_strip<'a>(
        ifd: &mut IFD,
        image_data: &mut BTreeMap<usize, &'a [f32]>,
        ifd_index: usize,
        samples: &'a [f32]
    ) {
        let byte_count = std::mem::size_of_val(samples) as u64;
        debug!("Setting up single strip: {} bytes", byte_count);

        ifd.add_entry(IFDEntry::new(
            tags::STRIP_OFFSETS,
            field_types::LONG,
            1,
            0)
        );

        ifd.add_entry(IFDEntry::new(
            tags::STRIP_BYTE_COUNTS,
            field_types::LONG,
            1,
            byte_count)
        );

        if let Some((_, height)) = ifd.get_dimensions() {
            ifd.add_entry(IFDEntry::new(
                tags::ROWS_PER_STRIP,
                field_types::LONG,
                1,
                height)
            );
        }

        image_data.insert(ifd_index, samples);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_slice_carries_fixed_tags() {
        let samples = [0.0f32; 6];
        let mut image_data = BTreeMap::new();
        let mut ifd = IFD::new(0, 0);
        BasicTagsBuilder::add_float_gray_tags(&mut ifd, 3, 2);
        BasicTagsBuilder::setup_single_strip(&mut ifd, &mut image_data, 0, &samples);

        assert_eq!(ifd.get_dimensions(), Some((3, 2)));
        assert_eq!(ifd.get_tag_value(tags::BITS_PER_SAMPLE), Some(32));
        assert_eq!(ifd.get_tag_value(tags::SAMPLE_FORMAT), Some(sample_format::IEEEFP as u64));
        assert_eq!(ifd.get_tag_value(tags::ROWS_PER_STRIP), Some(2));
        assert_eq!(ifd.get_tag_value(tags::STRIP_BYTE_COUNTS), Some(24));
        assert_eq!(ifd.entry_count(), 11);
        assert_eq!(image_data.len(), 1);
    }
}
