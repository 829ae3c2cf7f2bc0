use std::sync::Arc;

use bit_record::prelude::*;
use chrono::{NaiveDate, NaiveTime};
use proptest::prelude::*;

fn every_kind() -> Arc<Map> {
    Arc::new(
        MapBuilder::new("Kinds")
            .record(
                RecordDef::new("All")
                    .field(FieldDef::boolean("flag").labels("On", "Off"))
                    .field(FieldDef::integer("count", 12))
                    .field(FieldDef::integer("mask", 12).hex())
                    .field(FieldDef::currency("price", 24))
                    .field(FieldDef::date("day", 16))
                    .field(FieldDef::time("at", 11))
                    .field(FieldDef::enumeration(
                        "mode",
                        2,
                        [
                            EnumItem::new(0, "Off"),
                            EnumItem::new(1, "On"),
                            EnumItem::new(2, "Auto"),
                        ],
                    ))
                    .field(FieldDef::reserved(3))
                    .field(FieldDef::bit_array("bits", 6))
                    .field(FieldDef::byte_array("raw", 16))
                    .field(FieldDef::integer_array("levels", 8, 4)),
            )
            .build()
            .unwrap(),
    )
}

fn all_store() -> StoreData<ImageSource> {
    let map = every_kind();
    let source = ImageSource::in_memory(&map);
    StoreData::new(map, source).unwrap()
}

#[test]
fn every_kind_round_trips() {
    let mut store = all_store();
    let all = store.record_mut("All").unwrap();

    all.set("flag", "on").unwrap();
    assert_eq!(all.get("flag", ValueClass::Bool).unwrap(), FieldValue::Bool(true));
    assert_eq!(all.get("flag", ValueClass::Text).unwrap(), "On".into());

    all.set("count", "4,095").unwrap();
    assert_eq!(all.get("count", ValueClass::Int).unwrap(), FieldValue::Int(4095));

    all.set("mask", "0xa5").unwrap();
    assert_eq!(all.get("mask", ValueClass::Text).unwrap(), "0x0A5".into());

    all.set("price", 1999).unwrap();
    assert_eq!(all.get("price", ValueClass::Text).unwrap(), "$19.99".into());

    let day = NaiveDate::from_ymd_opt(2031, 12, 1).unwrap();
    all.set("day", "01/12/2031").unwrap();
    assert_eq!(all.get("day", ValueClass::Date).unwrap(), day.into());

    let at = NaiveDate::from_ymd_opt(2020, 1, 1)
        .unwrap()
        .and_hms_opt(23, 59, 30)
        .unwrap();
    all.set("at", at).unwrap();
    assert_eq!(all.get("at", ValueClass::Text).unwrap(), "23:59".into());
    assert_eq!(
        all.get("at", ValueClass::Time).unwrap(),
        NaiveTime::from_hms_opt(23, 59, 0).unwrap().into()
    );

    all.set("mode", "Auto").unwrap();
    assert_eq!(all.get("mode", ValueClass::Text).unwrap(), "2 - Auto".into());

    all.set("bits", "101101").unwrap();
    assert_eq!(all.get("bits", ValueClass::Text).unwrap(), "101101".into());

    all.set("raw", "0xBEEF").unwrap();
    assert_eq!(all.get("raw", ValueClass::Bytes).unwrap(), FieldValue::Bytes(vec![0xBE, 0xEF]));
    assert_eq!(all.get("raw", ValueClass::Text).unwrap(), "BEEF".into());

    all.set("levels", vec![10i64, 20, 30, 40]).unwrap();
    assert_eq!(
        all.get("levels", ValueClass::IntArray).unwrap(),
        FieldValue::IntArray(vec![10, 20, 30, 40])
    );
}

#[test]
fn shapes_outside_the_whitelist_are_rejected() {
    let mut store = all_store();
    let all = store.record_mut("All").unwrap();

    assert!(matches!(all.set("day", true), Err(DataError::TypeMismatch { .. })));
    assert!(matches!(all.set("levels", 5), Err(DataError::TypeMismatch { .. })));
    assert!(matches!(all.get("count", ValueClass::Date), Err(DataError::TypeMismatch { .. })));
    assert!(matches!(all.get("raw", ValueClass::Bool), Err(DataError::TypeMismatch { .. })));
}

#[test]
fn pieces_tile_their_records() {
    let map = every_kind();
    for record in map.records() {
        let fields: Vec<_> = map.fields_of(record).collect();
        for field in &fields {
            let total: usize = field.pieces().iter().map(|p| p.len()).sum();
            assert_eq!(total, field.bit_len(), "{}", field.name());
        }

        let mut spans: Vec<(usize, usize)> = fields
            .iter()
            .flat_map(|f| f.pieces().iter().map(|p| (p.offset(), p.end())))
            .collect();
        spans.sort();
        for pair in spans.windows(2) {
            assert!(pair[0].1 <= pair[1].0, "overlap {pair:?}");
        }
    }
}

#[test]
fn records_conserve_their_length() {
    let store = all_store();
    for view in store.views() {
        for record in view.records() {
            let items: usize = record.items().map(|i| i.data().bit_len()).sum();
            assert_eq!(items, record.bit_len());
        }
    }
}

#[test]
fn reserved_items_read_zero_and_refuse_data() {
    let mut store = all_store();
    let all = store.record_mut("All").unwrap();
    let name = all
        .items()
        .find(|i| i.data().is_reserved())
        .map(|i| i.name().to_string())
        .unwrap();

    all.set_bytes(&vec![0x00; all.byte_len()]).unwrap();
    let reserved = all.item(&name).unwrap();
    assert!(reserved.get_bytes().unwrap().iter().all(|&b| b == 0));
    assert!(matches!(
        all.item_mut(&name).unwrap().set_bytes(&[0x07]),
        Err(DataError::ReservedNotZero { .. })
    ));
}

#[test]
fn enumeration_values_outside_the_table_decode_to_the_sentinel() {
    let mut store = all_store();
    let all = store.record_mut("All").unwrap();

    all.set("mode", "On").unwrap();
    assert_eq!(all.get("mode", ValueClass::Text).unwrap(), "1 - On".into());

    all.set("mode", 3).unwrap();
    assert_eq!(all.get("mode", ValueClass::Text).unwrap(), "3 - Invalid".into());
    let (value, item) = all.item("mode").unwrap().enumerated().unwrap().unwrap();
    assert_eq!(value, 3);
    assert_eq!((item.value, item.label.as_str()), (-1, "Invalid"));
}

#[test]
fn integer_array_text() {
    let mut store = all_store();
    let all = store.record_mut("All").unwrap();

    all.set("levels", [1, 2, 3, 4]).unwrap();
    assert_eq!(all.get("levels", ValueClass::Text).unwrap(), "[ 1, 2, 3, 4 ]".into());
}

#[cfg(feature = "crc")]
mod crc {
    use super::*;

    fn header() -> StoreData<ImageSource> {
        let map = Arc::new(
            MapBuilder::new("Card")
                .record(
                    RecordDef::new("Header")
                        .field(FieldDef::boolean("flag"))
                        .field(FieldDef::integer("code", 7))
                        .field(FieldDef::byte_array("crc", 16)),
                )
                .build()
                .unwrap(),
        );
        let source = ImageSource::in_memory(&map);
        StoreData::new(map, source).unwrap()
    }

    #[test]
    fn flipping_a_code_bit_breaks_the_crc() {
        let mut store = header();
        let record = store.record_mut("Header").unwrap();

        record.set("flag", true).unwrap();
        record.set("code", 42).unwrap();
        let crc = CrcEvaluator::new(record).unwrap();
        crc.update(record).unwrap();
        assert!(crc.validate(record).unwrap());

        let mut bytes = record.get_bytes().unwrap();
        bytes[0] ^= 0b0000_0100;
        record.set_bytes(&bytes).unwrap();
        assert!(!crc.validate(record).unwrap());
    }

    #[test]
    fn crc_survives_a_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("card.img");

        let map = Arc::new(
            MapBuilder::new("Card")
                .record(
                    RecordDef::new("Header")
                        .field(FieldDef::boolean("flag"))
                        .field(FieldDef::integer("code", 7))
                        .field(FieldDef::byte_array("crc", 16)),
                )
                .build()
                .unwrap(),
        );

        {
            let source = ImageSource::create(&path, &map).unwrap();
            let mut store = StoreData::new(Arc::clone(&map), source).unwrap();
            let record = store.record_mut("Header").unwrap();
            record.set("code", 99).unwrap();
            CrcEvaluator::new(record).unwrap().update(record).unwrap();
            store.flush(false).unwrap();
        }

        let source = ImageSource::open(&path, &map).unwrap();
        let store = StoreData::new(map, source).unwrap();
        let record = store.record("Header").unwrap();
        assert_eq!(record.get("code", ValueClass::Int).unwrap(), FieldValue::Int(99));
        assert!(CrcEvaluator::new(record).unwrap().validate(record).unwrap());
    }
}

fn ordered(byte_order: ByteOrder, bit_order: BitOrder) -> Arc<Map> {
    Arc::new(
        MapBuilder::new("Ordered")
            .byte_order(byte_order)
            .bit_order(bit_order)
            .record(
                RecordDef::new("R")
                    .field(FieldDef::integer("a", 13))
                    .field(FieldDef::integer("b", 19))
                    .field(FieldDef::integer("c", 8)),
            )
            .build()
            .unwrap(),
    )
}

proptest! {
    #[test]
    fn encode_then_decode_is_identity(
        little_bytes in any::<bool>(),
        lsb0 in any::<bool>(),
        a in 0i64..(1 << 13),
        b in 0i64..(1 << 19),
    ) {
        let map = ordered(ByteOrder::from_little(little_bytes), BitOrder::from_little(lsb0));
        let source = ImageSource::in_memory(&map);
        let mut store = StoreData::new(map, source).unwrap();
        let record = store.record_mut("R").unwrap();

        record.set("a", a).unwrap();
        record.set("b", b).unwrap();
        record.set("c", 0xA5).unwrap();

        prop_assert_eq!(record.get("a", ValueClass::Int).unwrap(), FieldValue::Int(a));
        prop_assert_eq!(record.get("b", ValueClass::Int).unwrap(), FieldValue::Int(b));
        prop_assert_eq!(record.get("c", ValueClass::Int).unwrap(), FieldValue::Int(0xA5));
    }
}
