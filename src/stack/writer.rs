//! Stack writer
//!
//! Writes a float32 volume as one directory per slice, each slice a single
//! uncompressed strip of IEEE float samples.

use log::info;
use std::path::Path;

use crate::tiff::builder::TiffBuilder;
use crate::tiff::errors::{TiffError, TiffResult};

use super::shape::Shape;

/// Checks that `samples` fills a volume of `shape` with no zero dimension
pub fn validate_shape(samples: &[f32], shape: Shape) -> TiffResult<()> {
    let invalid = || TiffError::InvalidShape {
        slices: shape.slices,
        rows: shape.rows,
        cols: shape.cols,
        samples: samples.len(),
    };

    if shape.slices == 0 || shape.rows == 0 || shape.cols == 0 {
        return Err(invalid());
    }
    match shape.volume() {
        Ok(volume) if volume == samples.len() => Ok(()),
        _ => Err(invalid()),
    }
}

/// Builds the directories of a stack without writing them
pub fn build_stack(samples: &[f32], shape: Shape) -> TiffResult<TiffBuilder<'_>> {
    validate_shape(samples, shape)?;

    let width = u32::try_from(shape.cols)
        .map_err(|_| TiffError::UnsupportedFormat(format!("{} columns exceed the TIFF limit", shape.cols)))?;
    let height = u32::try_from(shape.rows)
        .map_err(|_| TiffError::UnsupportedFormat(format!("{} rows exceed the TIFF limit", shape.rows)))?;

    let mut builder = TiffBuilder::new();
    for slice in samples.chunks_exact(shape.slice_len()) {
        builder.add_float_slice(width, height, slice)?;
    }
    Ok(builder)
}

/// Writes `samples` with shape `shape` to `path`
///
/// A file this call created and then failed to finish is removed. An
/// existing entry that could not be opened is left alone.
pub fn write_stack<P: AsRef<Path>>(path: P, samples: &[f32], shape: Shape) -> TiffResult<()> {
    let path = path.as_ref();
    info!("Writing stack {} to {}", shape, path.display());

    build_stack(samples, shape)?.write(path)
}
