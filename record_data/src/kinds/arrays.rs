use bit_span::{BitSpanError, bit, from_bit_string, new_buffer, set_bit, to_bit_string, value_offset};

use super::Codec;
use crate::bits::fits;
use crate::error::{DataError, Result};
use crate::value::{FieldValue, ValueClass};

fn checked_len(codec: &Codec<'_>, bytes: &[u8]) -> Result<Vec<u8>> {
    if bytes.len() != codec.byte_len() {
        return Err(codec.wrong_length(codec.byte_len(), bytes.len(), "bytes"));
    }
    Ok(bytes.to_vec())
}

pub(super) fn decode_bits(codec: &Codec<'_>, raw: &[u8], class: ValueClass) -> Result<FieldValue> {
    match class {
        ValueClass::Bytes => Ok(FieldValue::Bytes(raw.to_vec())),
        ValueClass::Text => {
            let offset = value_offset(codec.bit_order, codec.bits);
            Ok(FieldValue::Text(to_bit_string(codec.bit_order, raw, offset, codec.bits)?))
        }
        other => Err(codec.refuse(other)),
    }
}

pub(super) fn encode_bits(codec: &Codec<'_>, value: &FieldValue) -> Result<Vec<u8>> {
    match value {
        FieldValue::Bytes(bytes) => checked_len(codec, bytes),
        FieldValue::Text(text) => {
            let text = text.trim();
            let count = text.chars().count();
            if count != codec.bits {
                return Err(codec.wrong_length(codec.bits, count, "bits"));
            }
            from_bit_string(codec.bit_order, text).map_err(|e| match e {
                BitSpanError::InvalidDigit(_) => codec.unparsable(text, "bit string"),
                other => DataError::Range(other),
            })
        }
        other => Err(codec.reject(other)),
    }
}

pub(super) fn decode_bytes(codec: &Codec<'_>, raw: &[u8], class: ValueClass) -> Result<FieldValue> {
    match class {
        ValueClass::Bytes => Ok(FieldValue::Bytes(raw.to_vec())),
        ValueClass::Text => Ok(FieldValue::Text(hex::encode_upper(raw))),
        other => Err(codec.refuse(other)),
    }
}

pub(super) fn encode_bytes(codec: &Codec<'_>, value: &FieldValue) -> Result<Vec<u8>> {
    match value {
        FieldValue::Bytes(bytes) => checked_len(codec, bytes),
        FieldValue::Text(text) => {
            let trimmed = text.trim();
            let digits: String = trimmed
                .strip_prefix("0x")
                .unwrap_or(trimmed)
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();
            let bytes = hex::decode(digits).map_err(|_| codec.unparsable(text, "hex bytes"))?;
            checked_len(codec, &bytes)
        }
        other => Err(codec.reject(other)),
    }
}

/// Elements are packed one after another from the start of the value
/// span, each most significant bit first.
pub(super) fn decode_ints(
    codec: &Codec<'_>,
    raw: &[u8],
    class: ValueClass,
    element_bits: usize,
    count: usize,
) -> Result<FieldValue> {
    if !matches!(class, ValueClass::IntArray | ValueClass::Text) {
        return Err(codec.refuse(class));
    }

    let start = value_offset(codec.bit_order, codec.bits);
    let mut values = Vec::with_capacity(count);
    for k in 0..count {
        let mut element = 0u64;
        for i in 0..element_bits {
            let set = bit(codec.bit_order, raw, start + k * element_bits + i)?;
            element = (element << 1) | u64::from(set);
        }
        values.push(i64::try_from(element).map_err(|_| codec.overflow(element))?);
    }

    if class == ValueClass::Text {
        let joined: Vec<String> = values.iter().map(i64::to_string).collect();
        Ok(FieldValue::Text(format!("[ {} ]", joined.join(", "))))
    } else {
        Ok(FieldValue::IntArray(values))
    }
}

fn parse_ints(codec: &Codec<'_>, text: &str) -> Result<Vec<i64>> {
    let inner = text
        .trim()
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .ok_or_else(|| codec.unparsable(text, "[ a, b, ... ] array"))?;
    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }
    inner
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<i64>()
                .map_err(|_| codec.unparsable(text, "[ a, b, ... ] array"))
        })
        .collect()
}

pub(super) fn encode_ints(
    codec: &Codec<'_>,
    value: &FieldValue,
    element_bits: usize,
    count: usize,
) -> Result<Vec<u8>> {
    let parsed;
    let values: &[i64] = match value {
        FieldValue::IntArray(values) => values,
        FieldValue::Text(text) => {
            parsed = parse_ints(codec, text)?;
            &parsed
        }
        other => return Err(codec.reject(other)),
    };
    if values.len() != count {
        return Err(codec.wrong_length(count, values.len(), "elements"));
    }

    let start = value_offset(codec.bit_order, codec.bits);
    let mut buf = new_buffer(codec.bits);
    for (k, &v) in values.iter().enumerate() {
        let element = match u64::try_from(v) {
            Ok(e) if fits(e, element_bits) => e,
            _ => {
                return Err(DataError::Overflow {
                    field: codec.name.to_string(),
                    value: v.to_string(),
                    bits: element_bits,
                });
            }
        };
        for i in 0..element_bits {
            let set = (element >> (element_bits - 1 - i)) & 1 == 1;
            set_bit(codec.bit_order, &mut buf, start + k * element_bits + i, set)?;
        }
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::FormatConfig;
    use crate::kinds::testing::codec;
    use record_map::FieldKind;

    #[test]
    fn bit_strings_must_match_width() {
        let config = FormatConfig::default();
        let kind = FieldKind::BitArray;
        let c = codec(&kind, 5, &config);

        let raw = encode_bits(&c, &"10110".into()).unwrap();
        assert_eq!(raw, vec![0b0001_0110]);
        assert_eq!(
            decode_bits(&c, &raw, ValueClass::Text).unwrap(),
            FieldValue::Text("10110".into())
        );
        assert!(matches!(
            encode_bits(&c, &"101".into()),
            Err(DataError::Length { unit: "bits", .. })
        ));
        assert!(matches!(
            encode_bits(&c, &"10120".into()),
            Err(DataError::Parse { .. })
        ));
    }

    #[test]
    fn byte_arrays_take_hex() {
        let config = FormatConfig::default();
        let kind = FieldKind::ByteArray;
        let c = codec(&kind, 16, &config);

        assert_eq!(encode_bytes(&c, &"0xBE EF".into()).unwrap(), vec![0xBE, 0xEF]);
        assert_eq!(
            decode_bytes(&c, &[0xBE, 0xEF], ValueClass::Text).unwrap(),
            FieldValue::Text("BEEF".into())
        );
        assert!(matches!(
            encode_bytes(&c, &"BE".into()),
            Err(DataError::Length { expected: 2, actual: 1, .. })
        ));
    }

    #[test]
    fn integer_arrays_pack_elements_in_order() {
        let config = FormatConfig::default();
        let kind = FieldKind::IntegerArray {
            element_bits: 4,
            count: 3,
        };
        let c = codec(&kind, 12, &config);

        let raw = encode_ints(&c, &FieldValue::IntArray(vec![1, 2, 15]), 4, 3).unwrap();
        assert_eq!(raw, vec![0x01, 0x2F]);
        assert_eq!(
            decode_ints(&c, &raw, ValueClass::Text, 4, 3).unwrap(),
            FieldValue::Text("[ 1, 2, 15 ]".into())
        );
        assert_eq!(encode_ints(&c, &"[1,2,15]".into(), 4, 3).unwrap(), raw);
        assert!(matches!(
            encode_ints(&c, &FieldValue::IntArray(vec![1, 16, 0]), 4, 3),
            Err(DataError::Overflow { bits: 4, .. })
        ));
        assert!(matches!(
            encode_ints(&c, &FieldValue::IntArray(vec![1, 2]), 4, 3),
            Err(DataError::Length { unit: "elements", .. })
        ));
    }
}
