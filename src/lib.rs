pub mod io;
pub mod format;
pub mod tiff;
pub mod compression;
pub mod stack;
pub mod config;
pub mod commands;
pub mod utils;
pub mod api;

pub use crate::api::{classify_container, count_directories, probe_shape, read_stack, read_stack_into, write_stack};
pub use crate::config::StackConfig;

pub use format::ContainerKind;
pub use stack::{ImageStack, Shape, StackReader};
pub use tiff::{TiffError, TiffReader, TiffResult};
