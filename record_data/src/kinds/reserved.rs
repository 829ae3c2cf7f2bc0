use bit_span::new_buffer;

use super::Codec;
use crate::error::{DataError, Result};
use crate::value::{FieldValue, ValueClass};

/// Reserved bits always decode as zero, whatever the medium holds.
pub(super) fn decode(codec: &Codec<'_>, _raw: &[u8], class: ValueClass) -> Result<FieldValue> {
    match class {
        ValueClass::Bytes => Ok(FieldValue::Bytes(new_buffer(codec.bits))),
        ValueClass::Int => Ok(FieldValue::Int(0)),
        ValueClass::Text => Ok(FieldValue::Text("0".repeat(codec.bits))),
        other => Err(codec.refuse(other)),
    }
}

pub(super) fn encode(codec: &Codec<'_>, value: &FieldValue) -> Result<Vec<u8>> {
    let not_zero = || DataError::ReservedNotZero {
        field: codec.name.to_string(),
    };
    match value {
        FieldValue::Bytes(bytes) => {
            if bytes.len() != codec.byte_len() {
                return Err(codec.wrong_length(codec.byte_len(), bytes.len(), "bytes"));
            }
            if bytes.iter().any(|&b| b != 0) {
                return Err(not_zero());
            }
            Ok(bytes.clone())
        }
        FieldValue::Int(0) => Ok(new_buffer(codec.bits)),
        FieldValue::Int(_) => Err(not_zero()),
        other => Err(codec.reject(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::FormatConfig;
    use crate::kinds::testing::codec;
    use record_map::FieldKind;

    #[test]
    fn reads_zero_and_refuses_non_zero() {
        let config = FormatConfig::default();
        let kind = FieldKind::Reserved;
        let c = codec(&kind, 5, &config);

        assert_eq!(decode(&c, &[0x1F], ValueClass::Int).unwrap(), FieldValue::Int(0));
        assert_eq!(
            decode(&c, &[0], ValueClass::Text).unwrap(),
            FieldValue::Text("00000".into())
        );
        assert!(matches!(
            encode(&c, &FieldValue::Bytes(vec![1])),
            Err(DataError::ReservedNotZero { .. })
        ));
        assert!(matches!(
            encode(&c, &FieldValue::Int(3)),
            Err(DataError::ReservedNotZero { .. })
        ));
        assert_eq!(encode(&c, &FieldValue::Int(0)).unwrap(), vec![0]);
        assert!(matches!(
            encode(&c, &FieldValue::Bool(false)),
            Err(DataError::TypeMismatch { .. })
        ));
    }
}
