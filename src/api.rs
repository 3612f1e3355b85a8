//! Public entry points
//!
//! Thin wrappers over `StackReader`, the stack writer and the container
//! sniffer, taking paths.

use std::path::Path;
use log::info;

use crate::format::{self, ContainerKind};
use crate::stack::{ImageStack, Shape, StackReader};
use crate::stack::writer;
use crate::tiff::errors::TiffResult;

pub use crate::tiff::reader::count_directories;

/// Reports the (slices, rows, cols) shape of a TIFF stack without decoding it
pub fn probe_shape<P: AsRef<Path>>(path: P) -> TiffResult<Shape> {
    StackReader::open(path)?.probe_shape()
}

/// Decodes a TIFF stack into a newly allocated float32 volume
pub fn read_stack<P: AsRef<Path>>(path: P) -> TiffResult<ImageStack> {
    StackReader::open(path)?.read_stack()
}

/// Decodes a TIFF stack into a buffer the caller sized from `probe_shape`
///
/// The buffer length must equal slices * rows * cols. On failure the buffer
/// is zero-filled.
pub fn read_stack_into<P: AsRef<Path>>(path: P, buffer: &mut [f32]) -> TiffResult<Shape> {
    StackReader::open(path)?.read_into(buffer)
}

/// Writes a float32 volume of `shape` as one directory per slice
pub fn write_stack<P: AsRef<Path>>(path: P, samples: &[f32], shape: Shape) -> TiffResult<()> {
    writer::write_stack(path, samples, shape)
}

/// Classifies a file by its magic bytes, `None` when unrecognized
pub fn classify_container<P: AsRef<Path>>(path: P) -> TiffResult<Option<ContainerKind>> {
    let path = path.as_ref();
    let kind = format::identify(path)?;
    info!("{}: {}", path.display(), kind.map_or("unknown", |k| k.name()));
    Ok(kind)
}
