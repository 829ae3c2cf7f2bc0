use std::error::Error;
use std::sync::Arc;

use bit_record::prelude::*;

fn card_map() -> Result<Map, SchemaError> {
    MapBuilder::new("Card")
        .describe("Loyalty card layout")
        .version(Version::new(1, 2, 0))
        .record(
            RecordDef::new("Header")
                .field(FieldDef::boolean("active").labels("Yes", "No"))
                .field(FieldDef::integer("issuer", 7))
                .field(FieldDef::byte_array("crc", 16)),
        )
        .record(
            RecordDef::new("Holder")
                .field(FieldDef::date("issued", 16))
                .field(FieldDef::time("opens", 11))
                .field(FieldDef::enumeration(
                    "tier",
                    2,
                    [
                        EnumItem::new(0, "Basic"),
                        EnumItem::new(1, "Silver"),
                        EnumItem::new(2, "Gold"),
                    ],
                ))
                .field(FieldDef::reserved(3))
                .field(FieldDef::currency("balance", 32))
                .field(FieldDef::integer_array("visits", 4, 4)),
        )
        .view(
            ViewBuilder::new("Summary").record(
                ViewRecordBuilder::new("Holder")
                    .field("tier")
                    .field("balance")
                    .reserved(6),
            ),
        )
        .build()
}

fn main() -> Result<(), Box<dyn Error>> {
    println!("=== Bit Record Quick Start ===\n");

    let map = Arc::new(card_map()?);
    println!("Map {} v{}", map.name(), map.version());
    for record in map.records() {
        println!("  record {} ({} bits)", record.name(), record.bit_len());
    }

    let source = ImageSource::in_memory(&map);
    let mut store = StoreData::new(Arc::clone(&map), source)?;

    let header = store.record_mut("Header")?;
    header.set("active", "yes")?;
    header.set("issuer", 42)?;
    let crc = CrcEvaluator::new(header)?;
    println!("\nRepaired {} CRC item(s)", crc.update(header)?);
    for item in header.visible_items() {
        println!("  {}", item.render()?);
    }

    let holder = store.record_mut("Holder")?;
    holder.set("issued", "14/03/2024")?;
    holder.set("opens", "09:15")?;
    holder.set("tier", "Gold")?;
    holder.set("balance", "$12,345.67")?;
    holder.set("visits", [3, 1, 4, 1])?;

    println!("\nHolder:");
    for item in holder.visible_items() {
        println!("  {:<10} {}", item.name(), item.text()?);
    }
    println!("  bytes: {:02X?}", holder.get_bytes()?);

    let summary = store.view("Summary")?.record("Holder")?;
    println!("\nSummary view:");
    for item in summary.items() {
        println!("  {}", item.render()?);
    }

    match store.record_mut("Holder")?.set("tier", true) {
        Err(e) => println!("\nRejected as expected: {e}"),
        Ok(()) => println!("\nUnexpectedly accepted a bool for an enumeration"),
    }

    store.flush(false)?;
    println!("\nPayload: {} bytes", store.source().payload().len());

    Ok(())
}
