//! TIFF writing strategy
//!
//! Lays out a little-endian classic TIFF as header, then every IFD, then
//! the strip data of every slice in directory order. All offsets are known
//! before the first byte is written, so the file is produced in a single
//! sequential pass.

use byteorder::{ByteOrder, LittleEndian};
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::compression::{CompressionFactory, CompressionHandler};
use crate::tiff::constants::{compression, header, tags};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;
use crate::utils::{ifd_utils, write_utils};

/// Writer buffer size
const WRITE_BUFFER_CAPACITY: usize = 1024 * 1024;

/// Handles writing TIFF files to disk
pub struct WriterBuilder;

impl WriterBuilder {
    /// Write a complete TIFF file to `output_path`
    ///
    /// If the file cannot be created, nothing on disk is touched. Once it has
    /// been created, a failure removes the half-written file.
    pub fn write(
        ifds: &[IFD],
        image_data: &BTreeMap<usize, &[f32]>,
        output_path: &Path
    ) -> TiffResult<()> {
        let file = File::create(output_path)?;

        if let Err(e) = Self::write_file(file, ifds, image_data) {
            if let Err(remove_err) = fs::remove_file(output_path) {
                warn!("Could not remove partial output {}: {}", output_path.display(), remove_err);
            }
            return Err(e);
        }
        Ok(())
    }

    fn write_file(file: File, ifds: &[IFD], image_data: &BTreeMap<usize, &[f32]>) -> TiffResult<()> {
        let mut writer = BufWriter::with_capacity(WRITE_BUFFER_CAPACITY, file);
        Self::write_to(&mut writer, ifds, image_data)?;
        writer.flush()?;
        Ok(())
    }

    /// Write a complete TIFF to `writer`
    pub fn write_to(
        writer: &mut impl Write,
        ifds: &[IFD],
        image_data: &BTreeMap<usize, &[f32]>
    ) -> TiffResult<()> {
        let sorted_ifds = Self::prepare_sorted_ifds(ifds);
        let (ifd_offsets, strip_offsets) = Self::calculate_offsets(&sorted_ifds, image_data)?;

        let first_ifd_offset = ifd_offsets.first().copied().unwrap_or(0);
        Self::write_header(writer, first_ifd_offset)?;
        Self::write_ifds(writer, &sorted_ifds, &ifd_offsets, &strip_offsets)?;
        Self::write_image_data(writer, image_data)?;

        info!("Wrote {} directories", sorted_ifds.len());
        Ok(())
    }

    /// Prepare sorted IFDs with unique tags
    fn prepare_sorted_ifds(ifds: &[IFD]) -> Vec<IFD> {
        ifds.iter().map(|ifd| {
            let mut sorted_ifd = ifd.clone();
            sorted_ifd.entries = write_utils::get_unique_sorted_entries(&ifd.entries);
            sorted_ifd
        }).collect()
    }

    /// Calculate the offsets of every IFD and every slice's strip
    ///
    /// Classic TIFF addresses the file with 32-bit offsets; a layout that
    /// ends past 4 GiB is rejected before anything is written.
    fn calculate_offsets(
        sorted_ifds: &[IFD],
        image_data: &BTreeMap<usize, &[f32]>
    ) -> TiffResult<(Vec<u64>, BTreeMap<usize, u64>)> {
        let mut current_offset = header::TIFF_HEADER_SIZE;
        let mut ifd_offsets = Vec::with_capacity(sorted_ifds.len());
        let mut strip_offsets = BTreeMap::new();

        for ifd in sorted_ifds {
            ifd_offsets.push(current_offset);
            current_offset += ifd_utils::calculate_ifd_size(ifd.entries.len() as u64, false);
        }

        for (&ifd_index, samples) in image_data {
            strip_offsets.insert(ifd_index, current_offset);
            current_offset += std::mem::size_of_val(*samples) as u64;
            current_offset = write_utils::align_to_4_bytes(current_offset);
        }

        if current_offset > u32::MAX as u64 {
            return Err(TiffError::UnsupportedFormat(format!(
                "stack needs {} bytes, classic TIFF is limited to 4 GiB", current_offset)));
        }
        debug!("Laid out {} IFDs, file size {}", ifd_offsets.len(), current_offset);

        Ok((ifd_offsets, strip_offsets))
    }

    /// Write the 8-byte header: byte order, version, first IFD offset
    fn write_header(writer: &mut impl Write, first_ifd_offset: u64) -> TiffResult<()> {
        writer.write_all(&header::LITTLE_ENDIAN_MARKER)?;
        writer.write_all(&header::TIFF_VERSION.to_le_bytes())?;
        writer.write_all(&(first_ifd_offset as u32).to_le_bytes())?;
        Ok(())
    }

    /// Write all IFDs back to back
    fn write_ifds(
        writer: &mut impl Write,
        sorted_ifds: &[IFD],
        ifd_offsets: &[u64],
        strip_offsets: &BTreeMap<usize, u64>
    ) -> TiffResult<()> {
        for (i, ifd) in sorted_ifds.iter().enumerate() {
            let next_ifd_offset = ifd_offsets.get(i + 1).copied().unwrap_or(0);
            Self::write_ifd(writer, ifd, next_ifd_offset, strip_offsets.get(&i).copied())?;
        }

        Ok(())
    }

    /// Write an IFD, patching StripOffsets with the laid out position
    fn write_ifd(
        writer: &mut impl Write,
        ifd: &IFD,
        next_offset: u64,
        strip_offset: Option<u64>
    ) -> TiffResult<()> {
        writer.write_all(&(ifd.entries.len() as u16).to_le_bytes())?;

        for entry in &ifd.entries {
            let value_offset = match (entry.tag, strip_offset) {
                (tags::STRIP_OFFSETS, Some(offset)) => offset,
                _ => entry.value_offset,
            };

            writer.write_all(&entry.tag.to_le_bytes())?;
            writer.write_all(&entry.field_type.to_le_bytes())?;
            writer.write_all(&(entry.count as u32).to_le_bytes())?;
            writer.write_all(&(value_offset as u32).to_le_bytes())?;
        }

        writer.write_all(&(next_offset as u32).to_le_bytes())?;
        Ok(())
    }

    /// Write every slice as one strip of little-endian float32 samples
    fn write_image_data(writer: &mut impl Write, image_data: &BTreeMap<usize, &[f32]>) -> TiffResult<()> {
        let handler = CompressionFactory::create_handler(compression::NONE as u64)?;
        let mut raw = Vec::new();

        for (&slice, samples) in image_data {
            raw.resize(std::mem::size_of_val(*samples), 0);
            LittleEndian::write_f32_into(samples, &mut raw);
            let strip = handler.compress(&raw)?;

            Self::write_slice(writer, &strip)
                .map_err(|e| TiffError::IoError(io::Error::new(e.kind(), format!(
                    "writing slice {}: {}", slice, e))))?;
            debug!("Wrote slice {} ({} bytes)", slice, strip.len());
        }

        Ok(())
    }

    fn write_slice(writer: &mut impl Write, strip: &[u8]) -> io::Result<()> {
        writer.write_all(strip)?;
        write_utils::write_padding(writer, strip.len())
    }
}
