//! TIFF writing utilities
//!
//! Helper functions for writing TIFF files, handling alignment and
//! entry ordering.

use crate::tiff::ifd::IFDEntry;
use std::collections::HashSet;
use std::io::{self, Write};

/// Align an offset to a 4-byte boundary
pub fn align_to_4_bytes(offset: u64) -> u64 {
    let remainder = offset % 4;
    if remainder == 0 {
        offset
    } else {
        offset + (4 - remainder)
    }
}

/// Write the zero bytes that bring `data_len` up to a 4-byte boundary
pub fn write_padding(writer: &mut impl Write, data_len: usize) -> io::Result<()> {
    let padding = (4 - (data_len % 4)) % 4;
    if padding > 0 {
        writer.write_all(&[0u8; 3][..padding])?;
    }
    Ok(())
}

/// Get a list of IFD entries sorted by tag number with duplicates removed
///
/// Tags must appear in ascending order, once each. If several entries
/// share a tag, the last one wins.
pub fn get_unique_sorted_entries(entries: &[IFDEntry]) -> Vec<IFDEntry> {
    let mut unique_entries = Vec::with_capacity(entries.len());
    let mut seen_tags = HashSet::new();

    for entry in entries.iter().rev() {
        if seen_tags.insert(entry.tag) {
            unique_entries.push(entry.clone());
        }
    }

    unique_entries.sort_by_key(|entry| entry.tag);
    unique_entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligns_offsets() {
        assert_eq!(align_to_4_bytes(8), 8);
        assert_eq!(align_to_4_bytes(9), 12);
        assert_eq!(align_to_4_bytes(11), 12);
    }

    #[test]
    fn pads_to_word_boundary() {
        let mut out = Vec::new();
        write_padding(&mut out, 5).unwrap();
        assert_eq!(out, vec![0, 0, 0]);
        out.clear();
        write_padding(&mut out, 8).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn keeps_last_entry_per_tag_in_tag_order() {
        let entries = vec![
            IFDEntry::new(257, 4, 1, 10),
            IFDEntry::new(256, 4, 1, 20),
            IFDEntry::new(257, 4, 1, 30),
        ];
        let sorted = get_unique_sorted_entries(&entries);
        assert_eq!(sorted.len(), 2);
        assert_eq!((sorted[0].tag, sorted[0].value_offset), (256, 20));
        assert_eq!((sorted[1].tag, sorted[1].value_offset), (257, 30));
    }
}
