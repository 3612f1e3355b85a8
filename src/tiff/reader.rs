//! TIFF container reader and directory walker
//!
//! `TiffReader` parses the header once and then walks the IFD chain one
//! directory at a time through `next_directory`. That single primitive is
//! what both shape discovery and full stack decoding iterate over, so the
//! number of directories they see can never disagree.

use log::{debug, info, trace, warn};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use crate::format;
use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::io::seekable::SeekableReader;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::{IFD, IFDEntry};
use crate::tiff::validation;
use crate::utils::{format_utils, ifd_utils, tag_utils};

/// Reader buffer size for files opened by path
const READ_BUFFER_CAPACITY: usize = 1024 * 1024;

/// Reader for TIFF and BigTIFF containers
pub struct TiffReader<R: SeekableReader> {
    /// Underlying seekable source
    reader: R,
    /// Byte order declared in the header
    byte_order: ByteOrder,
    /// Handler matching `byte_order`
    handler: Box<dyn ByteOrderHandler>,
    /// Whether the container is BigTIFF
    is_big_tiff: bool,
    /// Total size of the source in bytes
    file_size: u64,
    /// Offset of the next IFD to read, 0 when the chain is exhausted
    next_ifd_offset: u64,
    /// Number of directories returned so far
    directories_read: usize,
    /// IFD offsets already visited, for loop detection
    visited: HashSet<u64>,
}

impl<R: SeekableReader> TiffReader<R> {
    /// Creates a reader over any seekable source and parses the header
    ///
    /// This handles the first part of reading a TIFF file:
    /// 1. Detect byte order (little/big endian)
    /// 2. Check for TIFF or BigTIFF format
    /// 3. Read and validate the first IFD offset
    pub fn new(mut reader: R) -> TiffResult<Self> {
        let file_size = validation::get_file_size(&mut reader)?;
        reader.seek(SeekFrom::Start(0))?;

        let (byte_order, handler) = format_utils::detect_byte_order(&mut reader)?;
        let (is_big_tiff, _) = format_utils::detect_tiff_format(&mut reader, handler.as_ref())?;

        let first_ifd_offset = ifd_utils::read_ifd_offset(&mut reader, is_big_tiff, handler.as_ref())?;
        debug!("First IFD offset: {}", first_ifd_offset);
        validation::validate_ifd_offset(first_ifd_offset, file_size)?;

        Ok(TiffReader {
            reader,
            byte_order,
            handler,
            is_big_tiff,
            file_size,
            next_ifd_offset: first_ifd_offset,
            directories_read: 0,
            visited: HashSet::new(),
        })
    }

    /// Byte order of the container
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Returns whether the current file is a BigTIFF
    pub fn is_big_tiff(&self) -> bool {
        self.is_big_tiff
    }

    /// Size of the underlying source in bytes
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Number of directories returned by `next_directory` so far
    pub fn directories_read(&self) -> usize {
        self.directories_read
    }

    /// Advances to the next directory in the chain
    ///
    /// Returns `Ok(None)` once the chain ends. The chain also ends, with a
    /// warning, at an offset outside the file, at an offset that was already
    /// visited, or at a directory that cannot be parsed. A failure on the
    /// very first directory is an error: the file has no readable image.
    pub fn next_directory(&mut self) -> TiffResult<Option<IFD>> {
        let offset = self.next_ifd_offset;
        if offset == 0 {
            return Ok(None);
        }

        if !self.visited.insert(offset) {
            warn!("IFD offset {} already visited, stopping IFD chain", offset);
            self.next_ifd_offset = 0;
            return Ok(None);
        }

        let number = self.directories_read;
        match self.read_ifd(offset, number) {
            Ok((ifd, next_offset)) => {
                debug!("Read IFD #{} with {} entries, next offset {}", number, ifd.entry_count(), next_offset);
                self.next_ifd_offset = validation::sanitize_next_offset(next_offset, self.file_size);
                self.directories_read += 1;
                Ok(Some(ifd))
            },
            Err(e) if number == 0 => Err(e),
            Err(e) => {
                warn!("Error reading IFD {}: {}, stopping IFD chain", number, e);
                self.next_ifd_offset = 0;
                Ok(None)
            }
        }
    }

    /// Iterates over the remaining directories
    pub fn directories(&mut self) -> Directories<'_, R> {
        Directories { reader: self }
    }

    /// Reads an IFD and the offset of the one that follows it
    fn read_ifd(&mut self, offset: u64, number: usize) -> TiffResult<(IFD, u64)> {
        self.reader.seek(SeekFrom::Start(offset))?;

        let entry_count = ifd_utils::read_entry_count(&mut self.reader, self.is_big_tiff, self.handler.as_ref())?;
        let ifd_size = ifd_utils::calculate_ifd_size(entry_count, self.is_big_tiff);
        if !validation::validate_data_range(offset, ifd_size, self.file_size) {
            return Err(TiffError::GenericError(format!(
                "IFD at offset {} with {} entries exceeds file size {}",
                offset, entry_count, self.file_size)));
        }

        let mut ifd = IFD::new(number, offset);
        for _ in 0..entry_count {
            let entry = self.read_ifd_entry()?;
            ifd.add_entry(entry);
        }

        let next_offset = match ifd_utils::read_ifd_offset(&mut self.reader, self.is_big_tiff, self.handler.as_ref()) {
            Ok(next) => next,
            Err(e) => {
                warn!("Error reading next IFD offset: {}", e);
                0
            }
        };

        Ok((ifd, next_offset))
    }

    /// Reads a single IFD entry, decoding its value when stored inline
    fn read_ifd_entry(&mut self) -> TiffResult<IFDEntry> {
        let handler = self.handler.as_ref();

        let tag = handler.read_u16(&mut self.reader)?;
        let field_type = handler.read_u16(&mut self.reader)?;
        let count = if self.is_big_tiff {
            handler.read_u64(&mut self.reader)?
        } else {
            handler.read_u32(&mut self.reader)? as u64
        };

        let mut raw = vec![0u8; if self.is_big_tiff { 8 } else { 4 }];
        self.reader.read_exact(&mut raw)?;

        let mut cursor = Cursor::new(raw.as_slice());
        let value_offset = ifd_utils::read_ifd_offset(&mut cursor, self.is_big_tiff, handler)?;

        let mut entry = IFDEntry::with_values(tag, field_type, count, value_offset, Vec::new());
        if tag_utils::is_value_inline(&entry, self.is_big_tiff) {
            let mut cursor = Cursor::new(raw.as_slice());
            let mut values = Vec::with_capacity(count as usize);
            match tag_utils::read_tag_value_array(&mut cursor, &entry, handler, &mut values) {
                Ok(()) => entry.inline_values = values,
                Err(e) => trace!("Leaving inline value of tag {} undecoded: {}", tag, e),
            }
        }

        Ok(entry)
    }

    /// Reads a tag's values as a vector of u64
    ///
    /// Inline values come straight from the entry; larger arrays are read
    /// from their offset. Fails with `MissingTag` when the tag is absent.
    pub fn read_tag_values(&mut self, ifd: &IFD, tag: u16) -> TiffResult<Vec<u64>> {
        let entry = ifd.get_entry(tag)
            .ok_or(TiffError::MissingTag { directory: ifd.number, tag })?;

        if tag_utils::is_value_inline(entry, self.is_big_tiff) {
            return Ok(entry.inline_values.clone());
        }

        let data_len = tag_utils::field_type_size(entry.field_type).saturating_mul(entry.count);
        if !validation::validate_data_range(entry.value_offset, data_len, self.file_size) {
            return Err(TiffError::GenericError(format!(
                "Values of tag {} ({}) at offset {} exceed file size {}",
                tag, tag_utils::get_tag_name(tag), entry.value_offset, self.file_size)));
        }

        self.reader.seek(SeekFrom::Start(entry.value_offset))?;
        let mut values = Vec::with_capacity(entry.count as usize);
        tag_utils::read_tag_value_array(&mut self.reader, entry, self.handler.as_ref(), &mut values)?;

        Ok(values)
    }

    /// Reads the first value of a tag, if the tag is present
    pub fn read_tag_value(&mut self, ifd: &IFD, tag: u16) -> TiffResult<Option<u64>> {
        if !ifd.has_tag(tag) {
            return Ok(None);
        }
        Ok(self.read_tag_values(ifd, tag)?.first().copied())
    }

    /// Fills `buf` with the bytes stored at `offset`
    pub fn read_bytes_at(&mut self, offset: u64, buf: &mut [u8]) -> std::io::Result<()> {
        self.reader.seek(SeekFrom::Start(offset))?;
        self.reader.read_exact(buf)
    }
}

/// Iterator over the directories of a `TiffReader`
pub struct Directories<'a, R: SeekableReader> {
    reader: &'a mut TiffReader<R>,
}

impl<'a, R: SeekableReader> Iterator for Directories<'a, R> {
    type Item = TiffResult<IFD>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.next_directory().transpose()
    }
}

/// Counts the directories (pages) in a TIFF file
///
/// Files whose magic bytes are not a TIFF signature fail with `NotATiff`.
pub fn count_directories<P: AsRef<Path>>(path: P) -> TiffResult<usize> {
    let path = path.as_ref();
    info!("Counting directories in {}", path.display());
    let mut file = BufReader::with_capacity(READ_BUFFER_CAPACITY, File::open(path)?);
    format::ensure_tiff(&mut file)?;

    let mut reader = TiffReader::new(file)?;
    count_directories_in(&mut reader)
}

/// Counts the remaining directories of an open reader
pub fn count_directories_in<R: SeekableReader>(reader: &mut TiffReader<R>) -> TiffResult<usize> {
    let mut count = 0;
    for directory in reader.directories() {
        directory?;
        count += 1;
    }
    debug!("Counted {} directories", count);
    Ok(count)
}
