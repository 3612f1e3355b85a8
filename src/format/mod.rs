//! Image container detection
//!
//! Classifies files by their first four bytes so the stack entry points
//! can refuse anything that is not a TIFF before parsing it.

mod container;

pub use container::{classify_magic, ensure_tiff, identify, identify_reader, ContainerKind};
