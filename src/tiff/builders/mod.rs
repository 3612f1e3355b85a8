//! TIFF builder strategy modules
//!
//! Strategies used by `TiffBuilder`: the fixed tag set of a float slice
//! and the file layout writer.

pub mod basic_tags;
pub mod writer;
