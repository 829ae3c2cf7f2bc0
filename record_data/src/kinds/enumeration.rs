use bit_span::{invert_bits, value_offset};
use record_map::{EnumItem, INVALID_LABEL};

use super::Codec;
use crate::error::Result;
use crate::value::{FieldValue, ValueClass};

/// Flips the value span of an inverted enumeration.
fn flip(codec: &Codec<'_>, buf: &mut [u8]) -> Result<()> {
    let offset = value_offset(codec.bit_order, codec.bits);
    Ok(invert_bits(codec.bit_order, buf, offset, codec.bits)?)
}

/// Raw stored value and its table entry, or the `Invalid` sentinel.
pub(crate) fn lookup(
    codec: &Codec<'_>,
    raw: &[u8],
    inverted: bool,
    items: &[EnumItem],
) -> Result<(i64, EnumItem)> {
    let mut buf = raw.to_vec();
    if inverted {
        flip(codec, &mut buf)?;
    }
    let value = codec.read_int(&buf)?;
    let item = items
        .iter()
        .find(|item| item.value == value)
        .cloned()
        .unwrap_or_else(EnumItem::invalid);
    Ok((value, item))
}

pub(super) fn decode(
    codec: &Codec<'_>,
    raw: &[u8],
    class: ValueClass,
    inverted: bool,
    items: &[EnumItem],
) -> Result<FieldValue> {
    let (value, item) = lookup(codec, raw, inverted, items)?;
    match class {
        ValueClass::Int => Ok(FieldValue::Int(value)),
        ValueClass::Text => Ok(FieldValue::Text(format!("{} - {}", value, item.label))),
        other => Err(codec.refuse(other)),
    }
}

/// `"1 - On"` -> `(Some(1), "On")`; text without a numeric prefix is
/// returned whole.
fn split_value_prefix(text: &str) -> (Option<i64>, &str) {
    match text.split_once(" - ") {
        Some((head, tail)) => match head.trim().parse::<i64>() {
            Ok(value) => (Some(value), tail.trim()),
            Err(_) => (None, text),
        },
        None => (None, text),
    }
}

/// Values outside the item table are written as given.
pub(super) fn encode(
    codec: &Codec<'_>,
    value: &FieldValue,
    inverted: bool,
    items: &[EnumItem],
) -> Result<Vec<u8>> {
    let mut buf = match value {
        FieldValue::Int(i) => codec.write_int(*i)?,
        FieldValue::Text(text) => {
            let (prefix, label) = split_value_prefix(text.trim());
            let item = items
                .iter()
                .find(|item| item.label == label && label != INVALID_LABEL)
                .filter(|item| prefix.is_none_or(|value| value == item.value))
                .ok_or_else(|| codec.unparsable(text, "enumeration label"))?;
            codec.write_int(item.value)?
        }
        other => return Err(codec.reject(other)),
    };
    if inverted {
        flip(codec, &mut buf)?;
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataError;
    use crate::format::FormatConfig;
    use crate::kinds::testing::codec;
    use record_map::FieldKind;

    fn modes() -> Vec<EnumItem> {
        vec![
            EnumItem::new(0, "Off"),
            EnumItem::new(1, "On"),
            EnumItem::new(2, "Auto"),
        ]
    }

    #[test]
    fn labels_and_display_strings_are_accepted() {
        let config = FormatConfig::default();
        let kind = FieldKind::Enumeration {
            inverted: false,
            items: modes(),
        };
        let c = codec(&kind, 2, &config);

        assert_eq!(encode(&c, &"Auto".into(), false, &modes()).unwrap(), vec![2]);
        assert_eq!(encode(&c, &"1 - On".into(), false, &modes()).unwrap(), vec![1]);
        assert!(matches!(
            encode(&c, &"Standby".into(), false, &modes()),
            Err(DataError::Parse { .. })
        ));
    }

    #[test]
    fn display_prefix_must_match_the_label() {
        let config = FormatConfig::default();
        let kind = FieldKind::Enumeration {
            inverted: false,
            items: modes(),
        };
        let c = codec(&kind, 2, &config);

        match encode(&c, &"2 - On".into(), false, &modes()) {
            Err(DataError::Parse { text, .. }) => assert_eq!(text, "2 - On"),
            other => panic!("expected a parse error, got {other:?}"),
        }
        assert!(matches!(
            encode(&c, &"3 - Invalid".into(), false, &modes()),
            Err(DataError::Parse { .. })
        ));
        assert_eq!(encode(&c, &" 2 - Auto ".into(), false, &modes()).unwrap(), vec![2]);
    }

    #[test]
    fn unknown_values_decode_to_the_sentinel() {
        let config = FormatConfig::default();
        let kind = FieldKind::Enumeration {
            inverted: false,
            items: modes(),
        };
        let c = codec(&kind, 2, &config);

        let raw = encode(&c, &FieldValue::Int(3), false, &modes()).unwrap();
        let (value, item) = lookup(&c, &raw, false, &modes()).unwrap();
        assert_eq!(value, 3);
        assert!(item.is_invalid());
        assert_eq!(
            decode(&c, &raw, ValueClass::Text, false, &modes()).unwrap(),
            FieldValue::Text("3 - Invalid".into())
        );
    }

    #[test]
    fn inverted_fields_store_the_complement() {
        let config = FormatConfig::default();
        let kind = FieldKind::Enumeration {
            inverted: true,
            items: modes(),
        };
        let c = codec(&kind, 2, &config);

        let raw = encode(&c, &"On".into(), true, &modes()).unwrap();
        assert_eq!(raw, vec![0b10]);
        assert_eq!(
            decode(&c, &raw, ValueClass::Int, true, &modes()).unwrap(),
            FieldValue::Int(1)
        );
    }
}
