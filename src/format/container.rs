//! Magic-number sniffing for common image containers

use byteorder::{LittleEndian, ReadBytesExt};
use log::debug;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::tiff::errors::{TiffError, TiffResult};

/// Image container families recognized from their leading bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Bmp,
    Jpeg,
    Png,
    Tiff,
    Gif,
    Mng,
    Pcx,
}

impl ContainerKind {
    /// Short upper-case name of the container
    pub fn name(&self) -> &'static str {
        match self {
            ContainerKind::Bmp => "BMP",
            ContainerKind::Jpeg => "JPEG",
            ContainerKind::Png => "PNG",
            ContainerKind::Tiff => "TIFF",
            ContainerKind::Gif => "GIF",
            ContainerKind::Mng => "MNG",
            ContainerKind::Pcx => "PCX",
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classifies the first four bytes of a file, read as a little-endian u32
///
/// Byte 0 is the least significant byte, so `II*\0` reads as 0x002A4949
/// and the PNG signature `\x89PNG` reads as 0x474E5089.
pub fn classify_magic(magic: u32) -> Option<ContainerKind> {
    if magic & 0x0000_FFFF == 0x0000_4D42 {
        Some(ContainerKind::Bmp)
    } else if magic & 0x00FF_FFFF == 0x00FF_D8FF {
        Some(ContainerKind::Jpeg)
    } else if magic == 0x474E_5089 {
        Some(ContainerKind::Png)
    } else if magic == 0x002A_4949 || magic == 0x2A00_4D4D {
        Some(ContainerKind::Tiff)
    } else if magic == 0x3846_4947 {
        Some(ContainerKind::Gif)
    } else if magic == 0x474E_4D8A {
        Some(ContainerKind::Mng)
    } else if magic & 0xF0FF_00FF == 0x0001_000A && (magic >> 8) & 0xFF < 6 {
        Some(ContainerKind::Pcx)
    } else {
        None
    }
}

/// Reads the four magic bytes from `reader` and classifies them
///
/// Fails with an I/O error (UnexpectedEof) when fewer than four bytes
/// are available.
pub fn identify_reader(reader: &mut dyn Read) -> TiffResult<Option<ContainerKind>> {
    let magic = reader.read_u32::<LittleEndian>()?;
    let kind = classify_magic(magic);
    debug!("Magic {:#010x} classified as {}", magic, kind.map_or("unknown", |k| k.name()));
    Ok(kind)
}

/// Fails with `NotATiff` unless the magic bytes of `reader` are a TIFF signature
///
/// The error carries the detected container name, or "unknown".
pub fn ensure_tiff(reader: &mut dyn Read) -> TiffResult<()> {
    match identify_reader(reader)? {
        Some(ContainerKind::Tiff) => Ok(()),
        other => Err(TiffError::NotATiff(other.map_or("unknown", |kind| kind.name()).to_string())),
    }
}

/// Identifies the container type of the file at `path`
pub fn identify<P: AsRef<Path>>(path: P) -> TiffResult<Option<ContainerKind>> {
    let mut file = File::open(path.as_ref())?;
    identify_reader(&mut file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sniff(bytes: &[u8]) -> Option<ContainerKind> {
        identify_reader(&mut Cursor::new(bytes.to_vec())).unwrap()
    }

    #[test]
    fn recognizes_both_tiff_byte_orders() {
        assert_eq!(sniff(b"II*\0"), Some(ContainerKind::Tiff));
        assert_eq!(sniff(b"MM\0*"), Some(ContainerKind::Tiff));
        // BigTIFF has a different version word
        assert_eq!(sniff(b"II+\0"), None);
    }

    #[test]
    fn recognizes_other_signatures() {
        assert_eq!(sniff(&[0x89, b'P', b'N', b'G']), Some(ContainerKind::Png));
        assert_eq!(sniff(b"BM6\x0c"), Some(ContainerKind::Bmp));
        assert_eq!(sniff(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(ContainerKind::Jpeg));
        assert_eq!(sniff(b"GIF8"), Some(ContainerKind::Gif));
        assert_eq!(sniff(&[0x8A, b'M', b'N', b'G']), Some(ContainerKind::Mng));
    }

    #[test]
    fn pcx_requires_known_version() {
        assert_eq!(sniff(&[0x0A, 5, 1, 8]), Some(ContainerKind::Pcx));
        assert_eq!(sniff(&[0x0A, 6, 1, 8]), None);
    }

    #[test]
    fn ensure_tiff_names_the_detected_container() {
        assert!(ensure_tiff(&mut Cursor::new(b"MM\0*".to_vec())).is_ok());
        assert!(matches!(
            ensure_tiff(&mut Cursor::new(b"GIF89a".to_vec())),
            Err(TiffError::NotATiff(kind)) if kind == "GIF"
        ));
        assert!(matches!(
            ensure_tiff(&mut Cursor::new(vec![1u8, 2, 3, 4])),
            Err(TiffError::NotATiff(kind)) if kind == "unknown"
        ));
    }

    #[test]
    fn unknown_and_short_inputs() {
        assert_eq!(sniff(b"\0\0\0\0"), None);
        assert!(identify_reader(&mut Cursor::new(vec![0x49u8, 0x49])).is_err());
    }
}
