//! Image File Directory (IFD) structures and methods
//!
//! Each directory of a multi-page TIFF is one slice of a stack. An IFD is
//! a collection of tag entries; small values live inline in the entry,
//! larger arrays live elsewhere in the file at `value_offset`.

use std::collections::HashMap;
use std::fmt;
use log::{debug, trace};

use crate::tiff::constants::tags;
use crate::utils::tag_utils;

/// Represents an Image File Directory (IFD) in a TIFF file
#[derive(Debug, Clone)]
pub struct IFD {
    /// Entries in this IFD
    pub entries: Vec<IFDEntry>,
    /// IFD number (0-based)
    pub number: usize,
    /// Offset to this IFD in the file
    pub offset: u64,
    /// Index into `entries` for quick lookup by tag
    tag_map: HashMap<u16, usize>,
}

/// Represents an entry in an Image File Directory (IFD)
#[derive(Debug, Clone)]
pub struct IFDEntry {
    /// TIFF tag identifier
    pub tag: u16,
    /// Field type
    pub field_type: u16,
    /// Number of values
    pub count: u64,
    /// Value or offset to values
    pub value_offset: u64,
    /// Values decoded from the entry itself when they fit inline
    pub inline_values: Vec<u64>,
}

impl IFDEntry {
    /// Creates a new IFD entry
    ///
    /// For single values that fit in a classic TIFF entry, value_offset is
    /// the value itself and is also exposed through `inline_values`.
    pub fn new(tag: u16, field_type: u16, count: u64, value_offset: u64) -> Self {
        let inline_values = if count == 1 && tag_utils::field_type_size(field_type) <= 4 {
            vec![value_offset]
        } else {
            Vec::new()
        };

        Self::with_values(tag, field_type, count, value_offset, inline_values)
    }

    /// Creates an entry whose inline values were already decoded
    pub fn with_values(tag: u16, field_type: u16, count: u64, value_offset: u64, inline_values: Vec<u64>) -> Self {
        trace!("IFD entry: tag={} ({}), type={} ({}), count={}, offset/value={}",
               tag, tag_utils::get_tag_name(tag),
               field_type, tag_utils::get_field_type_name(field_type),
               count, value_offset);

        Self {
            tag,
            field_type,
            count,
            value_offset,
            inline_values,
        }
    }

    /// Returns a human-readable description of this entry
    pub fn description(&self) -> String {
        let tag_name = tag_utils::get_tag_name(self.tag);
        let field_type_name = tag_utils::get_field_type_name(self.field_type);

        let value = self.inline_values.first().copied().unwrap_or(self.value_offset);
        let value_display = match self.tag {
            tags::COMPRESSION => format!("{} ({})", value, tag_utils::get_compression_name(value)),
            tags::PHOTOMETRIC_INTERPRETATION => format!("{} ({})", value, tag_utils::get_photometric_name(value)),
            _ if self.inline_values.is_empty() => format!("@{}", self.value_offset),
            _ => value.to_string(),
        };

        format!("Tag: {} ({}), Type: {} ({}), Count: {}, Value: {}",
                self.tag, tag_name, self.field_type, field_type_name, self.count, value_display)
    }
}

impl IFD {
    /// Creates a new, empty IFD with the given index and file offset
    pub fn new(number: usize, offset: u64) -> Self {
        debug!("Creating new IFD #{} at offset {}", number, offset);

        Self {
            entries: Vec::new(),
            number,
            offset,
            tag_map: HashMap::new(),
        }
    }

    /// Adds an entry to this IFD, replacing any earlier entry with the same tag
    pub fn add_entry(&mut self, entry: IFDEntry) {
        trace!("Adding entry to IFD #{}: {}", self.number, entry.description());

        match self.tag_map.get(&entry.tag) {
            Some(&index) => self.entries[index] = entry,
            None => {
                self.tag_map.insert(entry.tag, self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    /// Gets the first inline value of a tag
    ///
    /// Returns None when the tag is absent or its values are stored
    /// out of line (use `TiffReader::read_tag_values` for those).
    pub fn get_tag_value(&self, tag: u16) -> Option<u64> {
        self.get_entry(tag)
            .and_then(|entry| entry.inline_values.first().copied())
    }

    /// Checks if this IFD has a specific tag
    pub fn has_tag(&self, tag: u16) -> bool {
        self.tag_map.contains_key(&tag)
    }

    /// Gets an IFD entry by tag
    pub fn get_entry(&self, tag: u16) -> Option<&IFDEntry> {
        self.tag_map.get(&tag).map(|&index| &self.entries[index])
    }

    /// Gets the dimensions (width, height) of the image described by this IFD
    pub fn get_dimensions(&self) -> Option<(u64, u64)> {
        let width = self.get_tag_value(tags::IMAGE_WIDTH)?;
        let height = self.get_tag_value(tags::IMAGE_LENGTH)?;
        Some((width, height))
    }

    /// Gets the number of entries in this IFD
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Display for IFD {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "IFD #{} (offset: {})", self.number, self.offset)?;
        writeln!(f, "  Number of entries: {}", self.entries.len())?;

        if let Some((width, height)) = self.get_dimensions() {
            writeln!(f, "  Dimensions: {}x{}", width, height)?;
        }

        writeln!(f, "  Tags:")?;
        for entry in &self.entries {
            writeln!(f, "    {}", entry.description())?;
        }

        Ok(())
    }
}
