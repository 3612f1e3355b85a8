//! Utility modules for common functionality
//!
//! Helpers shared by the container reader, the stack decoder and the writer.

pub mod logger;
pub(crate) mod write_utils;
pub(crate) mod ifd_utils;
pub(crate) mod format_utils;
pub(crate) mod tag_utils;
pub(crate) mod buffer_utils;
