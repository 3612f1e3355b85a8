//! Custom error types for TIFF stack processing

use std::fmt;
use std::io;

/// TIFF-specific error types
#[derive(Debug)]
pub enum TiffError {
    /// I/O error
    IoError(io::Error),
    /// The file's magic bytes are not a TIFF signature
    NotATiff(String),
    /// A required tag is absent from a directory
    MissingTag { directory: usize, tag: u16 },
    /// Bit width, layout or encoding outside the supported set
    UnsupportedFormat(String),
    /// A strip could not be read or was shorter than its expected size
    StripDecodeError { directory: usize, strip: usize, reason: String },
    /// Buffer sizing or allocation failure
    AllocationError(String),
    /// Stack shape inconsistent with the supplied samples
    InvalidShape { slices: usize, rows: usize, cols: usize, samples: usize },
    /// Invalid TIFF header
    InvalidHeader,
    /// Invalid byte order marker
    InvalidByteOrder(u16),
    /// Invalid BigTIFF header
    InvalidBigTIFFHeader,
    /// Unsupported TIFF version
    UnsupportedVersion(u16),
    /// Unsupported field type
    UnsupportedFieldType(u16),
    /// Generic error with message
    GenericError(String),
}

impl fmt::Display for TiffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TiffError::IoError(e) => write!(f, "I/O error: {}", e),
            TiffError::NotATiff(kind) => write!(f, "Not a TIFF container (detected: {})", kind),
            TiffError::MissingTag { directory, tag } => write!(f,
                "Directory {} is missing required tag {} ({})",
                directory, tag, crate::utils::tag_utils::get_tag_name(*tag)),
            TiffError::UnsupportedFormat(msg) => write!(f, "Unsupported format: {}", msg),
            TiffError::StripDecodeError { directory, strip, reason } => write!(f,
                "Read error on strip {} of directory {}: {}", strip, directory, reason),
            TiffError::AllocationError(msg) => write!(f, "Allocation error: {}", msg),
            TiffError::InvalidShape { slices, rows, cols, samples } => write!(f,
                "Invalid stack shape [{}, {}, {}] for {} samples", slices, rows, cols, samples),
            TiffError::InvalidHeader => write!(f, "Invalid TIFF header"),
            TiffError::InvalidByteOrder(v) => write!(f, "Invalid byte order marker: {:#06x}", v),
            TiffError::InvalidBigTIFFHeader => write!(f, "Invalid BigTIFF header"),
            TiffError::UnsupportedVersion(v) => write!(f, "Unsupported TIFF version: {}", v),
            TiffError::UnsupportedFieldType(ft) => write!(f, "Unsupported field type: {}", ft),
            TiffError::GenericError(msg) => write!(f, "TIFF error: {}", msg),
        }
    }
}

impl std::error::Error for TiffError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TiffError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for TiffError {
    fn from(error: io::Error) -> Self {
        TiffError::IoError(error)
    }
}

/// Result type for TIFF operations
pub type TiffResult<T> = Result<T, TiffError>;

impl From<String> for TiffError {
    fn from(msg: String) -> Self {
        TiffError::GenericError(msg)
    }
}
