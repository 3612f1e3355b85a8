//! Stack reader
//!
//! Composes the container sniffer, the directory walker, the geometry
//! extractor and the strip decoder. The directory chain is walked exactly
//! once: the surveyed directories give the shape and are then decoded in
//! the same order, so the slice count can never drift from the number of
//! slices decoded.

use log::{debug, info};
use std::fs::File;
use std::io::{BufReader, Seek, SeekFrom};
use std::path::Path;

use crate::format;
use crate::io::seekable::SeekableReader;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;
use crate::tiff::reader::TiffReader;
use crate::utils::buffer_utils;

use super::descriptor::DirectoryDescriptor;
use super::shape::{ImageStack, Shape};
use super::strip_reader::{self, StripReader};

/// Destination for decoded samples
///
/// The decoder asks for a slice of exactly the volume length and, if
/// decoding fails, tells the buffer to drop whatever was written.
pub trait SampleBuffer {
    /// Returns `len` writable samples
    fn prepare(&mut self, len: usize) -> TiffResult<&mut [f32]>;

    /// Discards partially decoded content
    fn discard(&mut self);
}

/// Buffer allocated by the decoder and handed to the caller on success
#[derive(Debug, Default)]
pub struct OwnedBuffer {
    samples: Vec<f32>,
}

impl OwnedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }
}

impl SampleBuffer for OwnedBuffer {
    fn prepare(&mut self, len: usize) -> TiffResult<&mut [f32]> {
        self.samples = buffer_utils::try_alloc(len, "stack samples")?;
        Ok(&mut self.samples)
    }

    fn discard(&mut self) {
        self.samples = Vec::new();
    }
}

/// Caller-sized buffer, which must already match the volume length
impl SampleBuffer for [f32] {
    fn prepare(&mut self, len: usize) -> TiffResult<&mut [f32]> {
        if self.len() != len {
            return Err(TiffError::AllocationError(format!(
                "buffer holds {} samples, stack needs {}", self.len(), len)));
        }
        Ok(self)
    }

    fn discard(&mut self) {
        self.fill(0.0);
    }
}

/// One walked directory and its geometry
struct SurveyEntry {
    ifd: IFD,
    descriptor: DirectoryDescriptor,
}

/// Reads a multi-directory TIFF as a float32 volume
pub struct StackReader<R: SeekableReader> {
    tiff: TiffReader<R>,
}

impl StackReader<BufReader<File>> {
    /// Opens the file at `path`, refusing anything that is not a TIFF
    pub fn open<P: AsRef<Path>>(path: P) -> TiffResult<Self> {
        let path = path.as_ref();
        info!("Opening TIFF stack: {}", path.display());
        let file = File::open(path)?;
        Self::new(BufReader::new(file))
    }
}

impl<R: SeekableReader> StackReader<R> {
    /// Sniffs the container type of `source` and parses its TIFF header
    pub fn new(mut source: R) -> TiffResult<Self> {
        format::ensure_tiff(&mut source)?;
        source.seek(SeekFrom::Start(0))?;

        Ok(StackReader { tiff: TiffReader::new(source)? })
    }

    /// Walks every directory once, extracting and checking its geometry
    fn survey(&mut self) -> TiffResult<Vec<SurveyEntry>> {
        let mut entries: Vec<SurveyEntry> = Vec::new();

        while let Some(ifd) = self.tiff.next_directory()? {
            let descriptor = DirectoryDescriptor::extract(&mut self.tiff, &ifd)?;
            strip_reader::check_layout(&ifd, &descriptor)?;

            if let Some(first) = entries.first() {
                let expected = (first.descriptor.rows(), first.descriptor.cols());
                let found = (descriptor.rows(), descriptor.cols());
                if found != expected {
                    return Err(TiffError::UnsupportedFormat(format!(
                        "directory {} is {}x{}, directory 0 is {}x{}; slices must share one geometry",
                        descriptor.index, found.1, found.0, expected.1, expected.0)));
                }
            }
            entries.push(SurveyEntry { ifd, descriptor });
        }

        debug!("Surveyed {} directories", entries.len());
        Ok(entries)
    }

    /// `TiffReader::new` refuses a header without a first directory, so a
    /// survey of an opened file is never empty.
    fn shape_of(entries: &[SurveyEntry]) -> Shape {
        match entries.first() {
            Some(first) => Shape::new(entries.len(), first.descriptor.rows(), first.descriptor.cols()),
            None => Shape::new(0, 1, 1),
        }
    }

    /// Reports the stack shape without decoding any samples
    pub fn probe_shape(mut self) -> TiffResult<Shape> {
        let entries = self.survey()?;
        let shape = Self::shape_of(&entries);
        info!("Stack shape: {}", shape);
        Ok(shape)
    }

    /// Returns the stack shape together with the geometry of every directory
    pub fn describe(mut self) -> TiffResult<(Shape, Vec<DirectoryDescriptor>)> {
        let entries = self.survey()?;
        let shape = Self::shape_of(&entries);
        Ok((shape, entries.into_iter().map(|entry| entry.descriptor).collect()))
    }

    /// Decodes the whole stack into `buffer`
    ///
    /// On failure the buffer is discarded, so no partially decoded slice is
    /// ever observable.
    pub fn read_into<B: SampleBuffer + ?Sized>(mut self, buffer: &mut B) -> TiffResult<Shape> {
        let entries = self.survey()?;
        let shape = Self::shape_of(&entries);
        let len = shape.volume()?;

        let result = match buffer.prepare(len) {
            Ok(samples) => self.decode_all(&entries, shape, samples),
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            buffer.discard();
            return Err(e);
        }

        info!("Decoded stack {}", shape);
        Ok(shape)
    }

    /// Decodes the whole stack into a newly allocated volume
    pub fn read_stack(self) -> TiffResult<ImageStack> {
        let mut buffer = OwnedBuffer::new();
        let shape = self.read_into(&mut buffer)?;
        Ok(ImageStack::new(shape, buffer.into_samples()))
    }

    fn decode_all(&mut self, entries: &[SurveyEntry], shape: Shape, samples: &mut [f32]) -> TiffResult<()> {
        for (entry, slice) in entries.iter().zip(samples.chunks_exact_mut(shape.slice_len())) {
            StripReader::new(&mut self.tiff, &entry.ifd, &entry.descriptor).read_slice(slice)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_buffer_must_match_volume() {
        let mut buffer = vec![1.0f32; 4];
        assert!(matches!(buffer.as_mut_slice().prepare(5), Err(TiffError::AllocationError(_))));
        assert_eq!(buffer.as_mut_slice().prepare(4).unwrap().len(), 4);
    }

    #[test]
    fn discarded_caller_buffer_is_zeroed() {
        let mut buffer = vec![7.0f32; 3];
        buffer.as_mut_slice().discard();
        assert_eq!(buffer, vec![0.0; 3]);
    }

    #[test]
    fn owned_buffer_allocates_on_prepare() {
        let mut buffer = OwnedBuffer::new();
        assert_eq!(buffer.prepare(6).unwrap().len(), 6);
        buffer.discard();
        assert!(buffer.into_samples().is_empty());
    }
}
