//! I/O utilities for file handling
//!
//! Readers abstracted over files and in-memory buffers, and byte order
//! strategies for container fields and sample data.

pub mod seekable;
pub mod byte_order;
