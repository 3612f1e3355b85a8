//! Compression handling for TIFF strips
//!
//! Strip payloads pass through a `CompressionHandler` chosen from the
//! directory's Compression tag. Only uncompressed strips are supported;
//! the factory rejects every other scheme.

mod handler;
mod uncompressed;
mod factory;

pub use handler::CompressionHandler;
pub use uncompressed::UncompressedHandler;
pub use factory::CompressionFactory;
