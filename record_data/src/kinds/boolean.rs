use super::Codec;
use crate::error::Result;
use crate::value::{FieldValue, ValueClass};

pub(super) fn decode(
    codec: &Codec<'_>,
    raw: &[u8],
    class: ValueClass,
    true_label: &str,
    false_label: &str,
) -> Result<FieldValue> {
    match class {
        ValueClass::Bool => Ok(FieldValue::Bool(codec.read_uint(raw)? != 0)),
        ValueClass::Int => Ok(FieldValue::Int(codec.read_int(raw)?)),
        ValueClass::Text => {
            let label = if codec.read_uint(raw)? != 0 {
                true_label
            } else {
                false_label
            };
            Ok(FieldValue::Text(label.to_string()))
        }
        other => Err(codec.refuse(other)),
    }
}

pub(super) fn encode(
    codec: &Codec<'_>,
    value: &FieldValue,
    true_label: &str,
    false_label: &str,
) -> Result<Vec<u8>> {
    match value {
        FieldValue::Bool(b) => codec.write_uint(u64::from(*b)),
        FieldValue::Int(i) => codec.write_int(*i),
        FieldValue::Text(text) => {
            let label = text.trim().to_lowercase();
            if label == true_label.to_lowercase() {
                codec.write_uint(1)
            } else if label == false_label.to_lowercase() {
                codec.write_uint(0)
            } else {
                Err(codec.unparsable(text, "boolean label"))
            }
        }
        other => Err(codec.reject(other)),
    }
}
