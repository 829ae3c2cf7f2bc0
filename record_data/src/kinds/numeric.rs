use record_map::Radix;

use super::Codec;
use crate::error::Result;
use crate::value::{FieldValue, ValueClass};

pub(super) fn decode_integer(
    codec: &Codec<'_>,
    raw: &[u8],
    class: ValueClass,
    radix: Radix,
) -> Result<FieldValue> {
    match class {
        ValueClass::Int => Ok(FieldValue::Int(codec.read_int(raw)?)),
        ValueClass::Text => {
            let value = codec.read_uint(raw)?;
            let text = match radix {
                Radix::Decimal => codec.config.group(value),
                Radix::Hex => format!("0x{:0width$X}", value, width = codec.bits.div_ceil(4)),
            };
            Ok(FieldValue::Text(text))
        }
        other => Err(codec.refuse(other)),
    }
}

fn parse_integer(codec: &Codec<'_>, text: &str, radix: Radix) -> Result<u64> {
    let text = text.trim();
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => match radix {
            Radix::Hex => u64::from_str_radix(text, 16).ok(),
            Radix::Decimal => codec.config.parse_grouped(text),
        },
    };
    parsed.ok_or_else(|| codec.unparsable(text, "integer"))
}

pub(super) fn encode_integer(codec: &Codec<'_>, value: &FieldValue, radix: Radix) -> Result<Vec<u8>> {
    match value {
        FieldValue::Int(i) => codec.write_int(*i),
        FieldValue::Text(text) => codec.write_uint(parse_integer(codec, text, radix)?),
        other => Err(codec.reject(other)),
    }
}

/// Currency values are integer cents.
pub(super) fn decode_currency(codec: &Codec<'_>, raw: &[u8], class: ValueClass) -> Result<FieldValue> {
    match class {
        ValueClass::Int => Ok(FieldValue::Int(codec.read_int(raw)?)),
        ValueClass::Text => Ok(FieldValue::Text(codec.config.currency(codec.read_uint(raw)?))),
        other => Err(codec.refuse(other)),
    }
}

pub(super) fn encode_currency(codec: &Codec<'_>, value: &FieldValue) -> Result<Vec<u8>> {
    match value {
        FieldValue::Int(cents) => codec.write_int(*cents),
        FieldValue::Text(text) => {
            let cents = codec
                .config
                .parse_currency(text)
                .ok_or_else(|| codec.unparsable(text, "currency amount"))?;
            codec.write_uint(cents)
        }
        other => Err(codec.reject(other)),
    }
}
