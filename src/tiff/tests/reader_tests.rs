//! Tests for header parsing and directory walking

use std::io::Cursor;

use crate::io::byte_order::ByteOrder;
use crate::tiff::constants::tags;
use crate::tiff::errors::TiffError;
use crate::tiff::reader::{count_directories_in, TiffReader};

use super::test_utils::{
    create_big_endian_tiff_buffer, create_chained_tiff_buffer, create_test_bigtiff_buffer,
    create_test_tiff_buffer, CHAINED_IFD_SIZE,
};

#[test]
fn test_reads_classic_directory() {
    let mut reader = TiffReader::new(create_test_tiff_buffer()).unwrap();
    assert_eq!(reader.byte_order(), ByteOrder::LittleEndian);
    assert!(!reader.is_big_tiff());

    let ifd = reader.next_directory().unwrap().unwrap();
    assert_eq!(ifd.number, 0);
    assert_eq!(ifd.get_dimensions(), Some((800, 600)));
    assert!(reader.next_directory().unwrap().is_none());
    assert_eq!(reader.directories_read(), 1);
}

#[test]
fn test_reads_bigtiff_directory() {
    let mut reader = TiffReader::new(create_test_bigtiff_buffer()).unwrap();
    assert!(reader.is_big_tiff());

    let ifd = reader.next_directory().unwrap().unwrap();
    assert_eq!(ifd.get_dimensions(), Some((1024, 768)));
    assert_eq!(count_directories_in(&mut reader).unwrap(), 0);
}

#[test]
fn test_counts_chained_directories() {
    let mut reader = TiffReader::new(create_chained_tiff_buffer(3, 0)).unwrap();
    assert_eq!(count_directories_in(&mut reader).unwrap(), 3);
}

#[test]
fn test_directories_keep_chain_order() {
    let mut reader = TiffReader::new(create_chained_tiff_buffer(3, 0)).unwrap();
    let widths: Vec<u64> = reader.directories()
        .map(|ifd| ifd.unwrap().get_tag_value(tags::IMAGE_WIDTH).unwrap())
        .collect();
    assert_eq!(widths, vec![1, 2, 3]);
}

#[test]
fn test_loop_in_chain_stops_walk() {
    let mut reader = TiffReader::new(create_chained_tiff_buffer(2, 8)).unwrap();
    assert_eq!(count_directories_in(&mut reader).unwrap(), 2);
}

#[test]
fn test_out_of_range_next_offset_stops_walk() {
    let mut reader = TiffReader::new(create_chained_tiff_buffer(2, 9999)).unwrap();
    assert_eq!(count_directories_in(&mut reader).unwrap(), 2);
}

#[test]
fn test_truncated_later_directory_ends_chain() {
    let mut buffer = create_chained_tiff_buffer(3, 0).into_inner();
    buffer.truncate(8 + 2 * CHAINED_IFD_SIZE as usize + 4);

    let mut reader = TiffReader::new(Cursor::new(buffer)).unwrap();
    assert_eq!(count_directories_in(&mut reader).unwrap(), 2);
}

#[test]
fn test_invalid_first_offset_is_rejected() {
    let mut buffer = create_test_tiff_buffer().into_inner();
    buffer[4..8].copy_from_slice(&5000u32.to_le_bytes());

    assert!(matches!(TiffReader::new(Cursor::new(buffer)), Err(TiffError::InvalidHeader)));
}

#[test]
fn test_unknown_version_is_rejected() {
    let mut buffer = create_test_tiff_buffer().into_inner();
    buffer[2] = 41;

    assert!(matches!(TiffReader::new(Cursor::new(buffer)), Err(TiffError::UnsupportedVersion(41))));
}

#[test]
fn test_big_endian_values() {
    let mut reader = TiffReader::new(create_big_endian_tiff_buffer()).unwrap();
    assert_eq!(reader.byte_order(), ByteOrder::BigEndian);

    let ifd = reader.next_directory().unwrap().unwrap();
    assert_eq!(reader.read_tag_value(&ifd, tags::IMAGE_WIDTH).unwrap(), Some(300));
    assert_eq!(reader.read_tag_value(&ifd, tags::IMAGE_LENGTH).unwrap(), Some(200));
    assert_eq!(reader.read_tag_value(&ifd, tags::BITS_PER_SAMPLE).unwrap(), Some(16));
    assert_eq!(reader.read_tag_values(&ifd, tags::STRIP_OFFSETS).unwrap(), vec![100, 200]);
}

#[test]
fn test_missing_tag() {
    let mut reader = TiffReader::new(create_test_tiff_buffer()).unwrap();
    let ifd = reader.next_directory().unwrap().unwrap();

    assert_eq!(reader.read_tag_value(&ifd, tags::BITS_PER_SAMPLE).unwrap(), None);
    assert!(matches!(
        reader.read_tag_values(&ifd, tags::BITS_PER_SAMPLE),
        Err(TiffError::MissingTag { directory: 0, tag: tags::BITS_PER_SAMPLE })
    ));
}
