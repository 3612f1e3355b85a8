//! TIFF file construction
//!
//! `TiffBuilder` collects one IFD per slice together with the slice
//! samples it points at, then hands both to the writer strategy.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use log::{debug, info};

use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;

use crate::tiff::builders::basic_tags::BasicTagsBuilder;
use crate::tiff::builders::writer::WriterBuilder;

/// Builder for float32 grayscale TIFF stacks
pub struct TiffBuilder<'a> {
    pub ifds: Vec<IFD>,
    image_data: BTreeMap<usize, &'a [f32]>,
}

impl<'a> TiffBuilder<'a> {
    /// Create a new, empty TIFF builder
    pub fn new() -> Self {
        debug!("Creating new TiffBuilder");
        TiffBuilder {
            ifds: Vec::new(),
            image_data: BTreeMap::new(),
        }
    }

    /// Add an IFD to the TIFF
    pub fn add_ifd(&mut self, ifd: IFD) -> usize {
        let ifd_index = self.ifds.len();
        debug!("Adding IFD #{} to TiffBuilder", ifd_index);
        self.ifds.push(ifd);
        ifd_index
    }

    /// Adds a directory holding one float32 slice of `width` x `height`
    ///
    /// The slice is written as a single uncompressed strip.
    pub fn add_float_slice(&mut self, width: u32, height: u32, samples: &'a [f32]) -> TiffResult<usize> {
        let expected = width as usize * height as usize;
        if samples.len() != expected {
            return Err(TiffError::GenericError(format!(
                "slice of {}x{} needs {} samples, got {}", width, height, expected, samples.len())));
        }

        let ifd_index = self.add_ifd(IFD::new(self.ifds.len(), 0));
        let ifd = &mut self.ifds[ifd_index];
        BasicTagsBuilder::add_float_gray_tags(ifd, width, height);
        BasicTagsBuilder::setup_single_strip(ifd, &mut self.image_data, ifd_index, samples);

        Ok(ifd_index)
    }

    /// Number of directories added so far
    pub fn len(&self) -> usize {
        self.ifds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ifds.is_empty()
    }

    /// Write the TIFF file to disk
    pub fn write<P: AsRef<Path>>(&self, output_path: P) -> TiffResult<()> {
        info!("Writing {} directories to {}", self.ifds.len(), output_path.as_ref().display());
        WriterBuilder::write(&self.ifds, &self.image_data, output_path.as_ref())
    }

    /// Write the TIFF to any byte sink
    pub fn write_to(&self, writer: &mut impl Write) -> TiffResult<()> {
        WriterBuilder::write_to(writer, &self.ifds, &self.image_data)
    }
}

impl Default for TiffBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}
