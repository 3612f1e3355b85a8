//! TIFF container module
//!
//! This module provides structures and functions for reading
//! TIFF and BigTIFF directory chains and writing float32 stacks.

pub mod errors;
pub mod ifd;
pub mod reader;
pub mod builder;
mod builders;
pub(crate) mod constants;
pub(crate) mod validation;
#[cfg(test)]
mod tests;

pub use crate::io::byte_order::{BigEndianHandler, ByteOrder, ByteOrderHandler, LittleEndianHandler};
pub use errors::{TiffError, TiffResult};
pub use ifd::{IFD, IFDEntry};
pub use reader::{count_directories, TiffReader};
pub use builder::TiffBuilder;
