//! Float32 volume reading and writing over multi-directory TIFF
//!
//! Each directory of the container is one slice of a volume shaped
//! [slices, rows, cols].

pub mod descriptor;
pub mod normalizer;
pub mod reader;
pub mod shape;
pub(crate) mod strip_reader;
pub mod writer;

pub use descriptor::{DirectoryDescriptor, SampleWidth};
pub use reader::{OwnedBuffer, SampleBuffer, StackReader};
pub use shape::{ImageStack, Shape};
pub use writer::write_stack;
