//! TIFF-walker and resolver behavior over complete files.

mod common;

use exifscan::{ExifFatalError, MetadataError, ParseOptions, parse_bytes, tags};
use exifscan_types::exif::{Value, primitives::ExifType};

use common::{jpeg_with_exif, logger};

fn opts() -> ParseOptions {
    ParseOptions::default()
}

/// The classic 38-byte APP1: one Ascii entry of count 5 whose value slot
/// holds zero.
#[test]
fn single_ascii_entry() {
    logger();

    let mut file = vec![
        0xFF_u8, 0xD8, // SOI
        0xFF, 0xE1, 0x00, 0x26, // APP1, 36-byte body
        b'E', b'x', b'i', b'f', 0x00, 0x00, // identifier
        0x49, 0x49, 0x2A, 0x00, // II, 42
        0x08, 0x00, 0x00, 0x00, // first IFD at 8
        0x01, 0x00, // one entry
        0x0F, 0x01, 0x02, 0x00, 0x05, 0x00, 0x00, 0x00, // Make, Ascii, count 5
        0x00, 0x00, 0x00, 0x00, // value offset 0
        0x00, 0x00, 0x00, 0x00, // no next IFD
        0x00, 0x00, 0x00, 0x00, // padding
    ];
    file.extend_from_slice(&[0xFF, 0xD9]);

    let meta = parse_bytes(&file, &opts()).unwrap();

    let entry = meta.image_entries.get(&tags::MAKE).expect("Make present");
    assert_eq!(entry.ty(), ExifType::Ascii);
    assert_eq!(entry.count(), 5);
}

/// Identical logical content under Intel and Motorola alignment decodes to
/// identical scalars.
#[test]
fn endianness_law() {
    logger();

    // little-endian: Orientation = 6 (Short), ApertureValue = 4/1 at offset 38
    let mut le = Vec::new();
    le.extend_from_slice(b"II");
    le.extend_from_slice(42_u16.to_le_bytes().as_slice());
    le.extend_from_slice(8_u32.to_le_bytes().as_slice());
    le.extend_from_slice(2_u16.to_le_bytes().as_slice());
    le.extend_from_slice(0x0112_u16.to_le_bytes().as_slice());
    le.extend_from_slice(3_u16.to_le_bytes().as_slice());
    le.extend_from_slice(1_u32.to_le_bytes().as_slice());
    le.extend_from_slice(&[0x06, 0x00, 0x00, 0x00]);
    le.extend_from_slice(0x9202_u16.to_le_bytes().as_slice());
    le.extend_from_slice(5_u16.to_le_bytes().as_slice());
    le.extend_from_slice(1_u32.to_le_bytes().as_slice());
    le.extend_from_slice(38_u32.to_le_bytes().as_slice());
    le.extend_from_slice(0_u32.to_le_bytes().as_slice());
    le.extend_from_slice(4_u32.to_le_bytes().as_slice());
    le.extend_from_slice(1_u32.to_le_bytes().as_slice());

    // big-endian mirror of the same content
    let mut be = Vec::new();
    be.extend_from_slice(b"MM");
    be.extend_from_slice(42_u16.to_be_bytes().as_slice());
    be.extend_from_slice(8_u32.to_be_bytes().as_slice());
    be.extend_from_slice(2_u16.to_be_bytes().as_slice());
    be.extend_from_slice(0x0112_u16.to_be_bytes().as_slice());
    be.extend_from_slice(3_u16.to_be_bytes().as_slice());
    be.extend_from_slice(1_u32.to_be_bytes().as_slice());
    be.extend_from_slice(&[0x00, 0x06, 0x00, 0x00]);
    be.extend_from_slice(0x9202_u16.to_be_bytes().as_slice());
    be.extend_from_slice(5_u16.to_be_bytes().as_slice());
    be.extend_from_slice(1_u32.to_be_bytes().as_slice());
    be.extend_from_slice(38_u32.to_be_bytes().as_slice());
    be.extend_from_slice(0_u32.to_be_bytes().as_slice());
    be.extend_from_slice(4_u32.to_be_bytes().as_slice());
    be.extend_from_slice(1_u32.to_be_bytes().as_slice());

    let left = parse_bytes(&jpeg_with_exif(&le), &opts()).unwrap();
    let right = parse_bytes(&jpeg_with_exif(&be), &opts()).unwrap();

    assert_eq!(left.image_entries, right.image_entries);
    assert_eq!(
        left.image_entries.get(&tags::ORIENTATION).unwrap().as_u32(),
        6
    );
    assert_eq!(
        left.image_entries
            .get(&tags::APERTURE_VALUE)
            .unwrap()
            .as_rational()
            .to_f64(),
        Some(4.0)
    );
}

/// A scalar stored inline and the same scalar stored behind an offset
/// decode identically.
#[test]
fn inline_vs_offset_law() {
    logger();

    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"II");
    tiff.extend_from_slice(42_u16.to_le_bytes().as_slice());
    tiff.extend_from_slice(8_u32.to_le_bytes().as_slice());
    tiff.extend_from_slice(2_u16.to_le_bytes().as_slice());

    // count 1: two value bytes live inline in the slot
    tiff.extend_from_slice(0x1000_u16.to_le_bytes().as_slice());
    tiff.extend_from_slice(3_u16.to_le_bytes().as_slice());
    tiff.extend_from_slice(1_u32.to_le_bytes().as_slice());
    tiff.extend_from_slice(&[0x2A, 0x00, 0x00, 0x00]);

    // count 3: six value bytes force the offset form
    tiff.extend_from_slice(0x1001_u16.to_le_bytes().as_slice());
    tiff.extend_from_slice(3_u16.to_le_bytes().as_slice());
    tiff.extend_from_slice(3_u32.to_le_bytes().as_slice());
    tiff.extend_from_slice(38_u32.to_le_bytes().as_slice());

    tiff.extend_from_slice(0_u32.to_le_bytes().as_slice());

    // the offset-form values, first scalar equal to the inline one
    for v in [42_u16, 7, 9] {
        tiff.extend_from_slice(v.to_le_bytes().as_slice());
    }

    let meta = parse_bytes(&jpeg_with_exif(&tiff), &opts()).unwrap();

    let inline = meta.image_entries.get(&0x1000).unwrap();
    let offset = meta.image_entries.get(&0x1001).unwrap();

    assert_eq!(inline.try_u32(), Ok(42));
    assert_eq!(offset.try_u32(), Ok(42));
    assert_eq!(offset.value, Value::Short(vec![42, 7, 9]));
}

/// Thumbnail IFD with offset and length tags: the bytes come out exactly,
/// framed `FF D8 .. FF D9`, and a second parse agrees.
#[test]
fn thumbnail_extraction() {
    logger();

    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"II");
    tiff.extend_from_slice(42_u16.to_le_bytes().as_slice());
    tiff.extend_from_slice(8_u32.to_le_bytes().as_slice());

    // IFD 0: empty, chaining to the thumbnail IFD at 14
    tiff.extend_from_slice(0_u16.to_le_bytes().as_slice());
    tiff.extend_from_slice(14_u32.to_le_bytes().as_slice());

    // IFD 1: Compression = 6, offset = 100, length = 4
    tiff.extend_from_slice(3_u16.to_le_bytes().as_slice());
    for (tag, ty, value) in [
        (tags::COMPRESSION, 3_u16, 6_u32),
        (tags::THUMBNAIL_OFFSET, 4, 100),
        (tags::THUMBNAIL_LENGTH, 4, 4),
    ] {
        tiff.extend_from_slice(tag.to_le_bytes().as_slice());
        tiff.extend_from_slice(ty.to_le_bytes().as_slice());
        tiff.extend_from_slice(1_u32.to_le_bytes().as_slice());
        tiff.extend_from_slice(value.to_le_bytes().as_slice());
    }
    tiff.extend_from_slice(0_u32.to_le_bytes().as_slice());

    // thumbnail bytes at offset 100
    tiff.resize(100, 0);
    tiff.extend_from_slice(&[0xFF, 0xD8, 0xFF, 0xD9]);

    let file = jpeg_with_exif(&tiff);
    let meta = parse_bytes(&file, &opts()).unwrap();

    assert_eq!(meta.thumbnail, &[0xFF, 0xD8, 0xFF, 0xD9]);
    assert!(!meta.thumbnail_heuristic);
    assert!(meta.thumbnail.starts_with(&[0xFF, 0xD8]));
    assert!(meta.thumbnail.ends_with(&[0xFF, 0xD9]));

    // idempotent
    assert_eq!(parse_bytes(&file, &opts()).unwrap().thumbnail, meta.thumbnail);
}

/// Without the Compression tag the thumbnail still comes out, flagged
/// heuristic.
#[test]
fn thumbnail_without_compression_tag() {
    logger();

    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"II");
    tiff.extend_from_slice(42_u16.to_le_bytes().as_slice());
    tiff.extend_from_slice(8_u32.to_le_bytes().as_slice());
    tiff.extend_from_slice(0_u16.to_le_bytes().as_slice());
    tiff.extend_from_slice(14_u32.to_le_bytes().as_slice());

    tiff.extend_from_slice(2_u16.to_le_bytes().as_slice());
    for (tag, value) in [(tags::THUMBNAIL_OFFSET, 60_u32), (tags::THUMBNAIL_LENGTH, 2)] {
        tiff.extend_from_slice(tag.to_le_bytes().as_slice());
        tiff.extend_from_slice(4_u16.to_le_bytes().as_slice());
        tiff.extend_from_slice(1_u32.to_le_bytes().as_slice());
        tiff.extend_from_slice(value.to_le_bytes().as_slice());
    }
    tiff.extend_from_slice(0_u32.to_le_bytes().as_slice());

    tiff.resize(60, 0);
    tiff.extend_from_slice(&[0xAB, 0xCD]);

    let meta = parse_bytes(&jpeg_with_exif(&tiff), &opts()).unwrap();

    assert_eq!(meta.thumbnail, &[0xAB, 0xCD]);
    assert!(meta.thumbnail_heuristic);
}

/// Motorola-order APEX aperture: stored as URational 4/1, reads back as 4.0.
#[test]
fn motorola_apex_aperture() {
    logger();

    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"MM");
    tiff.extend_from_slice(42_u16.to_be_bytes().as_slice());
    tiff.extend_from_slice(8_u32.to_be_bytes().as_slice());
    tiff.extend_from_slice(1_u16.to_be_bytes().as_slice());
    tiff.extend_from_slice(tags::APERTURE_VALUE.to_be_bytes().as_slice());
    tiff.extend_from_slice(5_u16.to_be_bytes().as_slice());
    tiff.extend_from_slice(1_u32.to_be_bytes().as_slice());
    tiff.extend_from_slice(26_u32.to_be_bytes().as_slice());
    tiff.extend_from_slice(0_u32.to_be_bytes().as_slice());

    // 8 rational bytes at offset 26: 00 00 00 04 | 00 00 00 01
    tiff.extend_from_slice(&[0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x01]);

    let meta = parse_bytes(&jpeg_with_exif(&tiff), &opts()).unwrap();

    let aperture = meta.image_entries.get(&tags::APERTURE_VALUE).unwrap();
    assert_eq!(aperture.as_rational().to_f64(), Some(4.0));
}

/// Entries inside the Exif sub-IFD land in the image map alongside IFD 0's
/// own.
#[test]
fn sub_ifd_entries_are_merged() {
    logger();

    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"II");
    tiff.extend_from_slice(42_u16.to_le_bytes().as_slice());
    tiff.extend_from_slice(8_u32.to_le_bytes().as_slice());

    // IFD 0: Orientation, plus the Exif sub-IFD pointer to offset 38
    tiff.extend_from_slice(2_u16.to_le_bytes().as_slice());
    tiff.extend_from_slice(tags::ORIENTATION.to_le_bytes().as_slice());
    tiff.extend_from_slice(3_u16.to_le_bytes().as_slice());
    tiff.extend_from_slice(1_u32.to_le_bytes().as_slice());
    tiff.extend_from_slice(&[0x01, 0x00, 0x00, 0x00]);
    tiff.extend_from_slice(tags::EXIF_IFD_POINTER.to_le_bytes().as_slice());
    tiff.extend_from_slice(4_u16.to_le_bytes().as_slice());
    tiff.extend_from_slice(1_u32.to_le_bytes().as_slice());
    tiff.extend_from_slice(38_u32.to_le_bytes().as_slice());
    tiff.extend_from_slice(0_u32.to_le_bytes().as_slice());

    // the sub-IFD at 38: ISO = 400
    tiff.extend_from_slice(1_u16.to_le_bytes().as_slice());
    tiff.extend_from_slice(tags::ISO.to_le_bytes().as_slice());
    tiff.extend_from_slice(3_u16.to_le_bytes().as_slice());
    tiff.extend_from_slice(1_u32.to_le_bytes().as_slice());
    tiff.extend_from_slice(&[0x90, 0x01, 0x00, 0x00]);
    tiff.extend_from_slice(0_u32.to_le_bytes().as_slice());

    let meta = parse_bytes(&jpeg_with_exif(&tiff), &opts()).unwrap();

    assert_eq!(
        meta.image_entries.get(&tags::ORIENTATION).unwrap().as_u32(),
        1
    );
    assert_eq!(meta.image_entries.get(&tags::ISO).unwrap().as_u32(), 400);
    assert!(meta.warnings.is_empty());
}

/// An IFD 0 entry with a bogus type code is dropped with a warning; its
/// neighbors survive.
#[test]
fn malformed_entry_is_dropped_not_fatal() {
    logger();

    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"II");
    tiff.extend_from_slice(42_u16.to_le_bytes().as_slice());
    tiff.extend_from_slice(8_u32.to_le_bytes().as_slice());

    tiff.extend_from_slice(2_u16.to_le_bytes().as_slice());

    // type code 200 doesn't exist
    tiff.extend_from_slice(0x5555_u16.to_le_bytes().as_slice());
    tiff.extend_from_slice(200_u16.to_le_bytes().as_slice());
    tiff.extend_from_slice(1_u32.to_le_bytes().as_slice());
    tiff.extend_from_slice(0_u32.to_le_bytes().as_slice());

    tiff.extend_from_slice(tags::ORIENTATION.to_le_bytes().as_slice());
    tiff.extend_from_slice(3_u16.to_le_bytes().as_slice());
    tiff.extend_from_slice(1_u32.to_le_bytes().as_slice());
    tiff.extend_from_slice(&[0x03, 0x00, 0x00, 0x00]);

    tiff.extend_from_slice(0_u32.to_le_bytes().as_slice());

    let meta = parse_bytes(&jpeg_with_exif(&tiff), &opts()).unwrap();

    assert!(!meta.image_entries.contains_key(&0x5555));
    assert_eq!(
        meta.image_entries.get(&tags::ORIENTATION).unwrap().as_u32(),
        3
    );
    assert_eq!(meta.warnings.len(), 1);
    assert_eq!(meta.warnings[0].tag, Some(0x5555));
}

/// A self-referential sub-IFD pointer terminates through the depth cap.
#[test]
fn cyclic_sub_ifd_terminates() {
    logger();

    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"II");
    tiff.extend_from_slice(42_u16.to_le_bytes().as_slice());
    tiff.extend_from_slice(8_u32.to_le_bytes().as_slice());

    // one entry: the Exif pointer, aimed back at this very IFD
    tiff.extend_from_slice(1_u16.to_le_bytes().as_slice());
    tiff.extend_from_slice(tags::EXIF_IFD_POINTER.to_le_bytes().as_slice());
    tiff.extend_from_slice(4_u16.to_le_bytes().as_slice());
    tiff.extend_from_slice(1_u32.to_le_bytes().as_slice());
    tiff.extend_from_slice(8_u32.to_le_bytes().as_slice());
    tiff.extend_from_slice(0_u32.to_le_bytes().as_slice());

    let meta = parse_bytes(&jpeg_with_exif(&tiff), &opts()).unwrap();

    assert!(
        meta.warnings
            .iter()
            .any(|w| matches!(w.error, exifscan::EntryError::CycleOrDepth { .. }))
    );
}

#[test]
fn wrong_tiff_magic_is_fatal() {
    logger();

    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"II");
    tiff.extend_from_slice(43_u16.to_le_bytes().as_slice());
    tiff.extend_from_slice(8_u32.to_le_bytes().as_slice());

    assert!(matches!(
        parse_bytes(&jpeg_with_exif(&tiff), &opts()),
        Err(MetadataError::Exif(ExifFatalError::BadTiffMagic {
            found: 43
        }))
    ));
}
