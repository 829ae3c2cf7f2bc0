//! File-backed images: persistence, verification and access rules.

use std::fs;
use std::io::{Seek, SeekFrom, Write};

use bit_span::BitOrder;
use proptest::prelude::*;
use record_map::{FieldDef, Map, MapBuilder, RecordDef, Version};
use record_source::{HEADER_LEN, ImageHeader, ImageSource, MAGIC, Source, SourceError};
use tempfile::tempdir;

fn card(version: Version) -> Map {
    MapBuilder::new("Card")
        .version(version)
        .record(
            RecordDef::new("Header")
                .field(FieldDef::boolean("flag"))
                .field(FieldDef::integer("code", 7)),
        )
        .record(RecordDef::new("Body").field(FieldDef::byte_array("data", 64)))
        .build()
        .unwrap()
}

fn write_body(source: &ImageSource, map: &Map, bytes: &[u8; 8]) {
    let piece = map.field("Body", "data").unwrap().pieces()[0];
    source
        .record("Body")
        .unwrap()
        .set_piece(&piece, BitOrder::Msb0, bytes, 0)
        .unwrap();
}

#[test]
fn created_image_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("card.img");
    let map = card(Version::new(1, 0, 0));

    let mut source = ImageSource::create(&path, &map).unwrap();
    let media_id = source.media_id();
    assert_eq!(fs::metadata(&path).unwrap().len() as usize, HEADER_LEN + 9);

    write_body(&source, &map, b"abcdefgh");
    source.close().unwrap();

    let reopened = ImageSource::open(&path, &map).unwrap();
    assert_eq!(reopened.media_id(), media_id);
    assert_eq!(&reopened.payload()[1..], b"abcdefgh");
}

#[test]
fn header_is_written_first() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("card.img");
    let map = card(Version::new(2, 1, 0));
    ImageSource::create(&path, &map).unwrap();

    let bytes = fs::read(&path).unwrap();
    let header: ImageHeader = bytemuck::pod_read_unaligned(&bytes[..HEADER_LEN]);
    assert_eq!(header.magic, MAGIC);
    assert_eq!((header.map_major, header.map_minor), (2, 1));
    assert_eq!(header.record_count, 2);
    assert_eq!(header.payload_len, 9);
}

#[test]
fn unflushed_writes_stay_in_memory() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("card.img");
    let map = card(Version::new(1, 0, 0));

    let source = ImageSource::create(&path, &map).unwrap();
    write_body(&source, &map, &[0xFF; 8]);

    let on_disk = ImageSource::open(&path, &map).unwrap();
    assert_eq!(on_disk.payload(), vec![0; 9]);
}

#[test]
fn corrupted_payload_is_a_device_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("card.img");
    let map = card(Version::new(1, 0, 0));
    ImageSource::create(&path, &map).unwrap();

    let mut file = fs::OpenOptions::new().write(true).open(&path).unwrap();
    file.seek(SeekFrom::Start(HEADER_LEN as u64 + 3)).unwrap();
    file.write_all(&[0x55]).unwrap();
    drop(file);

    assert!(matches!(
        ImageSource::open(&path, &map),
        Err(SourceError::Device(_))
    ));
}

#[test]
fn foreign_files_are_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("junk.img");
    fs::write(&path, b"short").unwrap();
    let map = card(Version::new(1, 0, 0));
    assert!(matches!(
        ImageSource::open(&path, &map),
        Err(SourceError::Device(_))
    ));

    fs::write(&path, vec![0u8; HEADER_LEN + 9]).unwrap();
    assert!(matches!(
        ImageSource::open(&path, &map),
        Err(SourceError::Device(_))
    ));

    assert!(matches!(
        ImageSource::open(dir.path().join("missing.img"), &map),
        Err(SourceError::Io(_))
    ));
}

#[test]
fn image_of_another_map_version_is_a_setup_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("card.img");
    ImageSource::create(&path, &card(Version::new(1, 0, 0))).unwrap();

    assert!(matches!(
        ImageSource::open(&path, &card(Version::new(1, 1, 0))),
        Err(SourceError::Setup(_))
    ));
}

#[test]
fn read_only_image_refuses_writes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("card.img");
    let map = card(Version::new(1, 0, 0));
    ImageSource::create(&path, &map).unwrap();

    let source = ImageSource::open_read_only(&path, &map).unwrap();
    assert!(source.is_read_only());
    let piece = map.field("Header", "code").unwrap().pieces()[0];
    let result = source
        .record("Header")
        .unwrap()
        .set_piece(&piece, BitOrder::Msb0, &[1], 1);
    assert!(matches!(result, Err(SourceError::Access(_))));
}

#[test]
fn forced_flush_rewrites_an_unchanged_image() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("card.img");
    let map = card(Version::new(1, 0, 0));
    let mut source = ImageSource::create(&path, &map).unwrap();

    fs::remove_file(&path).unwrap();
    source.flush(false).unwrap();
    assert!(!path.exists());

    source.flush(true).unwrap();
    assert!(ImageSource::open(&path, &map).is_ok());
}

#[cfg(feature = "mmap")]
#[test]
fn mapped_image_writes_through() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("card.img");
    let map = card(Version::new(1, 0, 0));
    ImageSource::create(&path, &map).unwrap();

    let mut mapped = ImageSource::map(&path, &map).unwrap();
    write_body(&mapped, &map, b"mmapped!");
    mapped.flush(false).unwrap();
    drop(mapped);

    let reopened = ImageSource::open(&path, &map).unwrap();
    assert_eq!(&reopened.payload()[1..], b"mmapped!");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_flushed_payload_survives_reopen(body in any::<[u8; 8]>(), code in 0u8..128) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("card.img");
        let map = card(Version::new(1, 0, 0));

        let mut source = ImageSource::create(&path, &map).unwrap();
        write_body(&source, &map, &body);
        let piece = map.field("Header", "code").unwrap().pieces()[0];
        source
            .record("Header")
            .unwrap()
            .set_piece(&piece, BitOrder::Msb0, &[code], 1)
            .unwrap();
        source.flush(false).unwrap();
        let expected = source.payload();

        let reopened = ImageSource::open(&path, &map).unwrap();
        prop_assert_eq!(reopened.payload(), expected);
        prop_assert_eq!(reopened.payload()[0] & 0x7F, code);
    }
}
