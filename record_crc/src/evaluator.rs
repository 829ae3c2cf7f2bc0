use bit_span::sub_bits;
use log::debug;
use record_data::{DataError, RecordData, Result};

use crate::crc16::crc16;

/// Width of every CRC item.
pub const CRC_BITS: usize = 16;

/// `crc`, `CRC`, `Crc2`, ... but not `crcs` or `my_crc`.
pub fn is_crc_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower
        .strip_prefix("crc")
        .is_some_and(|rest| rest.bytes().all(|b| b.is_ascii_digit()))
}

/// One CRC item and the run of items it protects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrcInstance {
    item: String,
    enclosed: Vec<String>,
    offset: usize,
    bit_len: usize,
}

impl CrcInstance {
    /// Name of the CRC item.
    pub fn item(&self) -> &str {
        &self.item
    }

    /// Items covered, in record order.
    pub fn enclosed(&self) -> &[String] {
        &self.enclosed
    }

    /// First covered bit in the record buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of covered bits.
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// CRC of the covered span of `record`, big-endian.
    pub fn compute(&self, record: &RecordData) -> Result<[u8; 2]> {
        let buf = record.get_bytes()?;
        let span = sub_bits(record.bit_order(), &buf, self.offset, self.bit_len)?;
        Ok(crc16(&span).to_be_bytes())
    }

    /// Value currently held by the CRC item.
    pub fn stored(&self, record: &RecordData) -> Result<Vec<u8>> {
        record.item(&self.item)?.get_bytes()
    }

    pub fn is_valid(&self, record: &RecordData) -> Result<bool> {
        Ok(self.stored(record)? == self.compute(record)?)
    }
}

/// Validates and repairs the CRC items of one record.
///
/// Items are partitioned in view order: each CRC item protects the items
/// between it and the previous CRC item. A record without CRC items is
/// always valid.
///
/// ```
/// use std::sync::Arc;
///
/// use record_crc::CrcEvaluator;
/// use record_data::StoreData;
/// use record_map::{FieldDef, MapBuilder, RecordDef};
/// use record_source::ImageSource;
///
/// let map = Arc::new(
///     MapBuilder::new("Card")
///         .record(
///             RecordDef::new("Header")
///                 .field(FieldDef::integer("code", 8))
///                 .field(FieldDef::byte_array("crc", 16)),
///         )
///         .build()
///         .unwrap(),
/// );
/// let source = ImageSource::in_memory(&map);
/// let mut store = StoreData::new(map, source).unwrap();
/// let header = store.record_mut("Header").unwrap();
///
/// let crc = CrcEvaluator::new(header).unwrap();
/// header.set("code", 0x31).unwrap();
/// assert!(!crc.validate(header).unwrap());
/// assert_eq!(crc.update(header).unwrap(), 1);
/// assert!(crc.validate(header).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct CrcEvaluator {
    record: String,
    instances: Vec<CrcInstance>,
}

impl CrcEvaluator {
    pub fn new(record: &RecordData) -> Result<Self> {
        let mut instances = Vec::new();
        let mut run: Vec<(String, usize, usize)> = Vec::new();

        for item in record.items() {
            let data = item.data();
            if !is_crc_name(item.name()) {
                run.push((item.name().to_string(), data.offset(), data.bit_len()));
                continue;
            }
            if data.bit_len() != CRC_BITS {
                return Err(DataError::Length {
                    field: item.name().to_string(),
                    expected: CRC_BITS,
                    actual: data.bit_len(),
                    unit: "bits",
                });
            }
            let enclosed = std::mem::take(&mut run);
            instances.push(CrcInstance {
                item: item.name().to_string(),
                offset: enclosed.iter().map(|(_, off, _)| *off).min().unwrap_or(0),
                bit_len: enclosed.iter().map(|(_, _, len)| *len).sum(),
                enclosed: enclosed.into_iter().map(|(name, _, _)| name).collect(),
            });
        }

        Ok(Self {
            record: record.name().to_string(),
            instances,
        })
    }

    pub fn record(&self) -> &str {
        &self.record
    }

    pub fn instances(&self) -> &[CrcInstance] {
        &self.instances
    }

    /// True when every CRC item holds the CRC of its run.
    pub fn validate(&self, record: &RecordData) -> Result<bool> {
        for instance in &self.instances {
            if !instance.is_valid(record)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Rewrites every stale CRC item. Returns how many were rewritten.
    pub fn update(&self, record: &mut RecordData) -> Result<usize> {
        let mut repaired = 0;
        for instance in &self.instances {
            let computed = instance.compute(record)?;
            if instance.stored(record)? == computed {
                continue;
            }
            record.item_mut(&instance.item)?.set_bytes(&computed)?;
            debug!(
                "{}: rewrote {} over {} bits as {:02X}{:02X}",
                self.record, instance.item, instance.bit_len, computed[0], computed[1]
            );
            repaired += 1;
        }
        Ok(repaired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crc_names() {
        for name in ["crc", "CRC", "Crc2", "crc10"] {
            assert!(is_crc_name(name), "{name}");
        }
        for name in ["crcs", "my_crc", "cr", "crc_2", ""] {
            assert!(!is_crc_name(name), "{name}");
        }
    }
}
