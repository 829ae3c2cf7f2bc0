//! Per-kind value codecs behind one dispatch point.
//!
//! Each codec turns a field's aligned value buffer into a [`FieldValue`] of
//! a requested [`ValueClass`] and back, accepting only the shapes its kind
//! whitelists.

mod arrays;
mod boolean;
mod enumeration;
mod numeric;
mod reserved;
mod temporal;

pub(crate) use enumeration::lookup as enumeration_entry;

use std::fmt::Display;

use bit_span::{BitOrder, ByteOrder};
use record_map::{FieldKind, KindTag};

use crate::bits::{decode_uint, encode_uint, fits};
use crate::error::{DataError, Result};
use crate::format::FormatConfig;
use crate::value::{FieldValue, ValueClass};

/// Kind of view items that only pad a view.
pub(crate) static RESERVED: FieldKind = FieldKind::Reserved;

/// Everything a codec needs to know about one item.
pub(crate) struct Codec<'a> {
    pub(crate) name: &'a str,
    pub(crate) kind: &'a FieldKind,
    pub(crate) bits: usize,
    pub(crate) byte_order: ByteOrder,
    pub(crate) bit_order: BitOrder,
    pub(crate) config: &'a FormatConfig,
}

impl Codec<'_> {
    pub(crate) fn tag(&self) -> KindTag {
        self.kind.tag()
    }

    pub(crate) fn reject(&self, value: &FieldValue) -> DataError {
        DataError::TypeMismatch {
            field: self.name.to_string(),
            kind: self.tag(),
            op: "accept",
            found: value.type_name(),
        }
    }

    pub(crate) fn refuse(&self, class: ValueClass) -> DataError {
        DataError::TypeMismatch {
            field: self.name.to_string(),
            kind: self.tag(),
            op: "be read as",
            found: class.as_str(),
        }
    }

    pub(crate) fn overflow(&self, value: impl Display) -> DataError {
        DataError::Overflow {
            field: self.name.to_string(),
            value: value.to_string(),
            bits: self.bits,
        }
    }

    pub(crate) fn unparsable(&self, text: &str, expected: &'static str) -> DataError {
        DataError::Parse {
            field: self.name.to_string(),
            text: text.to_string(),
            expected,
        }
    }

    pub(crate) fn wrong_length(&self, expected: usize, actual: usize, unit: &'static str) -> DataError {
        DataError::Length {
            field: self.name.to_string(),
            expected,
            actual,
            unit,
        }
    }

    pub(crate) fn byte_len(&self) -> usize {
        bit_span::byte_len(self.bits)
    }

    pub(crate) fn read_uint(&self, raw: &[u8]) -> Result<u64> {
        Ok(decode_uint(raw, self.bits, self.byte_order, self.bit_order)?)
    }

    /// Decoded value as a signed integer; values past `i64::MAX` overflow.
    pub(crate) fn read_int(&self, raw: &[u8]) -> Result<i64> {
        let value = self.read_uint(raw)?;
        i64::try_from(value).map_err(|_| self.overflow(value))
    }

    pub(crate) fn write_uint(&self, value: u64) -> Result<Vec<u8>> {
        if !fits(value, self.bits) {
            return Err(self.overflow(value));
        }
        Ok(encode_uint(value, self.bits, self.byte_order, self.bit_order)?)
    }

    /// Integers are unsigned on the wire; negatives overflow.
    pub(crate) fn write_int(&self, value: i64) -> Result<Vec<u8>> {
        let value = u64::try_from(value).map_err(|_| self.overflow(value))?;
        self.write_uint(value)
    }
}

pub(crate) fn decode(codec: &Codec<'_>, raw: &[u8], class: ValueClass) -> Result<FieldValue> {
    match codec.kind {
        FieldKind::Reserved => reserved::decode(codec, raw, class),
        FieldKind::Boolean {
            true_label,
            false_label,
        } => boolean::decode(codec, raw, class, true_label, false_label),
        FieldKind::Integer { radix } => numeric::decode_integer(codec, raw, class, *radix),
        FieldKind::Currency => numeric::decode_currency(codec, raw, class),
        FieldKind::Date => temporal::decode_date(codec, raw, class),
        FieldKind::Time => temporal::decode_time(codec, raw, class),
        FieldKind::BitArray => arrays::decode_bits(codec, raw, class),
        FieldKind::ByteArray => arrays::decode_bytes(codec, raw, class),
        FieldKind::IntegerArray {
            element_bits,
            count,
        } => arrays::decode_ints(codec, raw, class, *element_bits, *count),
        FieldKind::Enumeration { inverted, items } => {
            enumeration::decode(codec, raw, class, *inverted, items)
        }
    }
}

pub(crate) fn encode(codec: &Codec<'_>, value: &FieldValue) -> Result<Vec<u8>> {
    match codec.kind {
        FieldKind::Reserved => reserved::encode(codec, value),
        FieldKind::Boolean {
            true_label,
            false_label,
        } => boolean::encode(codec, value, true_label, false_label),
        FieldKind::Integer { radix } => numeric::encode_integer(codec, value, *radix),
        FieldKind::Currency => numeric::encode_currency(codec, value),
        FieldKind::Date => temporal::encode_date(codec, value),
        FieldKind::Time => temporal::encode_time(codec, value),
        FieldKind::BitArray => arrays::encode_bits(codec, value),
        FieldKind::ByteArray => arrays::encode_bytes(codec, value),
        FieldKind::IntegerArray {
            element_bits,
            count,
        } => arrays::encode_ints(codec, value, *element_bits, *count),
        FieldKind::Enumeration { inverted, items } => {
            enumeration::encode(codec, value, *inverted, items)
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Codec over a big-endian, MSB-first item.
    pub(crate) fn codec<'a>(kind: &'a FieldKind, bits: usize, config: &'a FormatConfig) -> Codec<'a> {
        Codec {
            name: "item",
            kind,
            bits,
            byte_order: ByteOrder::Big,
            bit_order: BitOrder::Msb0,
            config,
        }
    }
}
