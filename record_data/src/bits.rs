//! Unsigned integers to and from aligned value buffers.
//!
//! An integer is first serialised into `byte_len(bits)` bytes in the
//! record's byte order. Its value bits are then packed contiguously at
//! [`value_offset`], skipping the pad bits held in the most significant
//! byte. For matching orders (`Big`/`Msb0`, `Little`/`Lsb0`) the packing is
//! the identity; for mixed orders it keeps encode and decode inverse.

use bit_span::{BitOrder, BitSpanError, ByteOrder, byte_len, copy_bits, new_buffer, pad_len, value_offset};

type Result<T> = std::result::Result<T, BitSpanError>;

/// Whether `value` is representable in `bits` unsigned bits.
pub fn fits(value: u64, bits: usize) -> bool {
    bits >= 64 || value >> bits == 0
}

/// `(offset, len)` of the value bits of each serialised byte.
fn segments(
    bit_order: BitOrder,
    byte_order: ByteOrder,
    bits: usize,
) -> impl Iterator<Item = (usize, usize)> {
    let len = byte_len(bits);
    let pad = pad_len(bits);
    let top = byte_order.most_significant(len);
    (0..len).map(move |i| {
        if i == top {
            let skip = if bit_order.is_little() { 0 } else { pad };
            (i * 8 + skip, 8 - pad)
        } else {
            (i * 8, 8)
        }
    })
}

fn to_bytes(value: u64, len: usize, byte_order: ByteOrder) -> Vec<u8> {
    let be = value.to_be_bytes();
    let mut bytes = be[8 - len.min(8)..].to_vec();
    if byte_order.is_little() {
        bytes.reverse();
    }
    bytes
}

fn from_bytes(bytes: &[u8], byte_order: ByteOrder) -> u64 {
    let fold = |acc: u64, b: &u8| (acc << 8) | u64::from(*b);
    match byte_order {
        ByteOrder::Big => bytes.iter().fold(0, fold),
        ByteOrder::Little => bytes.iter().rev().fold(0, fold),
    }
}

/// Encodes the low `bits` bits of `value` (at most 64) into a value buffer.
///
/// ```
/// use bit_span::{BitOrder, ByteOrder};
/// use record_data::bits::{decode_uint, encode_uint};
///
/// let buf = encode_uint(0xABC, 12, ByteOrder::Big, BitOrder::Msb0).unwrap();
/// assert_eq!(buf, vec![0x0A, 0xBC]);
///
/// let mixed = encode_uint(0xABC, 12, ByteOrder::Little, BitOrder::Msb0).unwrap();
/// assert_eq!(decode_uint(&mixed, 12, ByteOrder::Little, BitOrder::Msb0).unwrap(), 0xABC);
/// ```
pub fn encode_uint(
    value: u64,
    bits: usize,
    byte_order: ByteOrder,
    bit_order: BitOrder,
) -> Result<Vec<u8>> {
    let raw = to_bytes(value, byte_len(bits), byte_order);
    let mut out = new_buffer(bits);
    let mut cursor = value_offset(bit_order, bits);
    for (offset, len) in segments(bit_order, byte_order, bits) {
        copy_bits(bit_order, &raw, offset, &mut out, cursor, len)?;
        cursor += len;
    }
    Ok(out)
}

/// Inverse of [`encode_uint`].
pub fn decode_uint(
    buf: &[u8],
    bits: usize,
    byte_order: ByteOrder,
    bit_order: BitOrder,
) -> Result<u64> {
    let mut raw = new_buffer(bits);
    let mut cursor = value_offset(bit_order, bits);
    for (offset, len) in segments(bit_order, byte_order, bits) {
        copy_bits(bit_order, buf, cursor, &mut raw, offset, len)?;
        cursor += len;
    }
    Ok(from_bytes(&raw, byte_order))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_orders_are_plain_serialisation() {
        assert_eq!(
            encode_uint(0x1234, 16, ByteOrder::Big, BitOrder::Msb0).unwrap(),
            vec![0x12, 0x34]
        );
        assert_eq!(
            encode_uint(0x1234, 16, ByteOrder::Little, BitOrder::Lsb0).unwrap(),
            vec![0x34, 0x12]
        );
        assert_eq!(
            encode_uint(0xABC, 12, ByteOrder::Little, BitOrder::Lsb0).unwrap(),
            vec![0xBC, 0x0A]
        );
    }

    #[test]
    fn mixed_orders_squeeze_the_pad() {
        let buf = encode_uint(0xABC, 12, ByteOrder::Little, BitOrder::Msb0).unwrap();
        assert_eq!(buf, vec![0x0B, 0xCA]);
        assert_eq!(
            decode_uint(&buf, 12, ByteOrder::Little, BitOrder::Msb0).unwrap(),
            0xABC
        );
    }

    #[test]
    fn fits_checks_width() {
        assert!(fits(127, 7));
        assert!(!fits(128, 7));
        assert!(fits(u64::MAX, 64));
        assert!(fits(0, 1));
    }
}
