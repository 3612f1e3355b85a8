//! Synthetic TIFF stacks for integration tests

#![allow(dead_code)]

use byteorder::{BigEndian, ByteOrder, LittleEndian, WriteBytesExt};
use std::fs;
use std::path::{Path, PathBuf};

const SHORT: u16 = 3;
const LONG: u16 = 4;

/// One directory of a synthetic stack
#[derive(Debug, Clone)]
pub struct SliceSpec {
    pub width: u32,
    pub height: u32,
    pub bits_per_sample: u16,
    /// Raw strip bytes for the whole slice, already in file byte order
    pub data: Vec<u8>,
    pub rows_per_strip: Option<u32>,
    pub samples_per_pixel: Option<u16>,
    /// Extra inline tags as (tag, field type, value)
    pub extra_tags: Vec<(u16, u16, u32)>,
    /// Tags to leave out of the directory
    pub omit_tags: Vec<u16>,
}

impl SliceSpec {
    pub fn new(width: u32, height: u32, bits_per_sample: u16, data: Vec<u8>) -> Self {
        SliceSpec {
            width,
            height,
            bits_per_sample,
            data,
            rows_per_strip: None,
            samples_per_pixel: Some(1),
            extra_tags: Vec::new(),
            omit_tags: Vec::new(),
        }
    }

    pub fn rows_per_strip(mut self, rows: u32) -> Self {
        self.rows_per_strip = Some(rows);
        self
    }

    pub fn samples_per_pixel(mut self, samples: Option<u16>) -> Self {
        self.samples_per_pixel = samples;
        self
    }

    pub fn tag(mut self, tag: u16, field_type: u16, value: u32) -> Self {
        self.extra_tags.push((tag, field_type, value));
        self
    }

    pub fn omit(mut self, tag: u16) -> Self {
        self.omit_tags.push(tag);
        self
    }
}

enum Value {
    Inline(u32),
    Array(Vec<u32>),
}

/// Builds a classic TIFF in byte order `B` with one directory per slice
///
/// Layout per directory: IFD, then its out-of-line arrays, then its strips.
fn build_tiff<B: ByteOrder>(marker: [u8; 2], slices: &[SliceSpec]) -> Vec<u8> {
    let mut buffer = Vec::new();
    buffer.extend_from_slice(&marker);
    buffer.write_u16::<B>(42).unwrap();
    buffer.write_u32::<B>(8).unwrap();

    for (index, slice) in slices.iter().enumerate() {
        let ifd_offset = buffer.len() as u32;
        let scanline = (slice.width as usize * slice.bits_per_sample as usize * slice.samples_per_pixel.unwrap_or(1) as usize).div_ceil(8);
        let rows_per_strip = slice.rows_per_strip.unwrap_or(slice.height.max(1)).max(1) as usize;
        let strip_bytes = (rows_per_strip * scanline).max(1);
        let strips: Vec<&[u8]> = if slice.data.is_empty() { vec![&[][..]] } else { slice.data.chunks(strip_bytes).collect() };

        let mut entries: Vec<(u16, u16, Value)> = vec![
            (256, LONG, Value::Inline(slice.width)),
            (257, LONG, Value::Inline(slice.height)),
            (258, SHORT, Value::Inline(slice.bits_per_sample as u32)),
            (259, SHORT, Value::Inline(1)),
            (262, SHORT, Value::Inline(1)),
        ];
        if let Some(samples) = slice.samples_per_pixel {
            entries.push((277, SHORT, Value::Inline(samples as u32)));
        }
        if let Some(rows) = slice.rows_per_strip {
            entries.push((278, LONG, Value::Inline(rows)));
        }
        entries.push((273, LONG, Value::Array(vec![0; strips.len()])));
        entries.push((279, LONG, Value::Array(strips.iter().map(|s| s.len() as u32).collect())));
        for &(tag, field_type, value) in &slice.extra_tags {
            entries.retain(|(t, _, _)| *t != tag);
            entries.push((tag, field_type, Value::Inline(value)));
        }
        entries.retain(|(tag, _, _)| !slice.omit_tags.contains(tag));
        entries.sort_by_key(|(tag, _, _)| *tag);

        let ifd_size = 2 + 12 * entries.len() as u32 + 4;
        let mut arrays_offset = ifd_offset + ifd_size;
        let array_bytes: u32 = entries.iter()
            .map(|(_, _, v)| match v { Value::Array(a) if a.len() > 1 => 4 * a.len() as u32, _ => 0 })
            .sum();
        let mut strip_offset = arrays_offset + array_bytes;
        let strip_offsets: Vec<u32> = strips.iter().map(|s| {
            let offset = strip_offset;
            strip_offset += s.len() as u32;
            offset
        }).collect();
        let next_ifd = if index + 1 < slices.len() { strip_offset } else { 0 };

        buffer.write_u16::<B>(entries.len() as u16).unwrap();
        let mut arrays: Vec<Vec<u32>> = Vec::new();
        for (tag, field_type, value) in &entries {
            let values = match (tag, value) {
                (273, _) => Value::Array(strip_offsets.clone()),
                (_, Value::Array(a)) => Value::Array(a.clone()),
                (_, Value::Inline(v)) => Value::Inline(*v),
            };
            buffer.write_u16::<B>(*tag).unwrap();
            buffer.write_u16::<B>(*field_type).unwrap();
            match values {
                Value::Inline(v) => {
                    buffer.write_u32::<B>(1).unwrap();
                    write_inline::<B>(&mut buffer, *field_type, v);
                },
                Value::Array(a) if a.len() == 1 => {
                    buffer.write_u32::<B>(1).unwrap();
                    buffer.write_u32::<B>(a[0]).unwrap();
                },
                Value::Array(a) => {
                    buffer.write_u32::<B>(a.len() as u32).unwrap();
                    buffer.write_u32::<B>(arrays_offset).unwrap();
                    arrays_offset += 4 * a.len() as u32;
                    arrays.push(a);
                },
            }
        }
        buffer.write_u32::<B>(next_ifd).unwrap();

        for array in arrays {
            for value in array {
                buffer.write_u32::<B>(value).unwrap();
            }
        }
        for strip in strips {
            buffer.extend_from_slice(strip);
        }
    }

    buffer
}

fn write_inline<B: ByteOrder>(buffer: &mut Vec<u8>, field_type: u16, value: u32) {
    if field_type == SHORT {
        buffer.write_u16::<B>(value as u16).unwrap();
        buffer.write_u16::<B>(0).unwrap();
    } else {
        buffer.write_u32::<B>(value).unwrap();
    }
}

/// Little-endian stack
pub fn build_le(slices: &[SliceSpec]) -> Vec<u8> {
    build_tiff::<LittleEndian>(*b"II", slices)
}

/// Big-endian stack
pub fn build_be(slices: &[SliceSpec]) -> Vec<u8> {
    build_tiff::<BigEndian>(*b"MM", slices)
}

/// Writes `bytes` to `name` inside `dir`
pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path
}

/// Encodes float32 samples in byte order `B`
pub fn f32_bytes<B: ByteOrder>(values: &[f32]) -> Vec<u8> {
    let mut bytes = vec![0u8; values.len() * 4];
    B::write_f32_into(values, &mut bytes);
    bytes
}
