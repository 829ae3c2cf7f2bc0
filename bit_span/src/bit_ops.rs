//! Stateless operations over byte buffers treated as bit streams.
//!
//! Every span is addressed by a logical bit offset and a bit count. The
//! [`BitOrder`] decides which physical bit of each byte a logical index lands
//! on; it never reorders bytes.

use crate::{BitOrder, BitSpanError};

#[cfg(not(feature = "std"))]
use alloc::{string::String, vec, vec::Vec};

type Result<T> = core::result::Result<T, BitSpanError>;

/// Number of bytes needed to hold `bits` bits.
#[inline]
pub const fn byte_len(bits: usize) -> usize {
    bits.div_ceil(8)
}

/// Unused bits in the last allocated byte of a `bits`-bit buffer.
#[inline]
pub const fn pad_len(bits: usize) -> usize {
    byte_len(bits) * 8 - bits
}

/// Logical offset at which a `bits`-bit value sits inside its own
/// `byte_len(bits)` buffer.
///
/// `Msb0` values are right-aligned (the pad occupies the leading bits), `Lsb0`
/// values start at bit 0 (the pad occupies the high bits of the last byte).
#[inline]
pub const fn value_offset(order: BitOrder, bits: usize) -> usize {
    match order {
        BitOrder::Lsb0 => 0,
        BitOrder::Msb0 => pad_len(bits),
    }
}

/// Zero-filled buffer sized for `bits` bits.
#[inline]
pub fn new_buffer(bits: usize) -> Vec<u8> {
    vec![0u8; byte_len(bits)]
}

#[inline]
fn check(bytes: usize, offset: usize, len: usize) -> Result<()> {
    let capacity = bytes * 8;
    match offset.checked_add(len) {
        Some(end) if end <= capacity => Ok(()),
        _ => Err(BitSpanError::OutOfRange {
            offset,
            len,
            capacity,
        }),
    }
}

#[inline(always)]
fn read_bit(order: BitOrder, buf: &[u8], index: usize) -> bool {
    (buf[index / 8] >> order.shift(index)) & 1 == 1
}

#[inline(always)]
fn write_bit(order: BitOrder, buf: &mut [u8], index: usize, bit: bool) {
    let mask = 1u8 << order.shift(index);
    if bit {
        buf[index / 8] |= mask;
    } else {
        buf[index / 8] &= !mask;
    }
}

/// Reads logical bit `index`.
pub fn bit(order: BitOrder, buf: &[u8], index: usize) -> Result<bool> {
    check(buf.len(), index, 1)?;
    Ok(read_bit(order, buf, index))
}

/// Writes logical bit `index`.
pub fn set_bit(order: BitOrder, buf: &mut [u8], index: usize, value: bool) -> Result<()> {
    check(buf.len(), index, 1)?;
    write_bit(order, buf, index, value);
    Ok(())
}

/// Copies `count` bits from `src` starting at `src_offset` into `dst` starting
/// at `dst_offset`. Bits of `dst` outside the target span are preserved.
///
/// ```
/// use bit_span::{BitOrder, copy_bits};
///
/// let src = [0b1011_0000u8];
/// let mut dst = [0u8; 1];
/// copy_bits(BitOrder::Msb0, &src, 0, &mut dst, 4, 4).unwrap();
/// assert_eq!(dst, [0b0000_1011]);
/// ```
pub fn copy_bits(
    order: BitOrder,
    src: &[u8],
    src_offset: usize,
    dst: &mut [u8],
    dst_offset: usize,
    count: usize,
) -> Result<()> {
    check(src.len(), src_offset, count)?;
    check(dst.len(), dst_offset, count)?;

    let mut done = 0;
    if src_offset % 8 == 0 && dst_offset % 8 == 0 {
        // whole bytes map onto whole bytes under either bit order
        let whole = count / 8;
        let (s, d) = (src_offset / 8, dst_offset / 8);
        dst[d..d + whole].copy_from_slice(&src[s..s + whole]);
        done = whole * 8;
    }

    for i in done..count {
        let b = read_bit(order, src, src_offset + i);
        write_bit(order, dst, dst_offset + i, b);
    }
    Ok(())
}

/// Flips every bit of the span in place.
pub fn invert_bits(order: BitOrder, buf: &mut [u8], offset: usize, count: usize) -> Result<()> {
    check(buf.len(), offset, count)?;
    for index in offset..offset + count {
        buf[index / 8] ^= 1u8 << order.shift(index);
    }
    Ok(())
}

/// Returns `true` when every bit of the span is clear.
pub fn is_zero(order: BitOrder, buf: &[u8], offset: usize, count: usize) -> Result<bool> {
    check(buf.len(), offset, count)?;
    Ok((offset..offset + count).all(|index| !read_bit(order, buf, index)))
}

/// Extracts the span into a fresh buffer of `byte_len(count)` bytes, aligned
/// at [`value_offset`].
pub fn sub_bits(order: BitOrder, buf: &[u8], offset: usize, count: usize) -> Result<Vec<u8>> {
    let mut out = new_buffer(count);
    copy_bits(order, buf, offset, &mut out, value_offset(order, count), count)?;
    Ok(out)
}

/// Renders the span as a string of `0`/`1` characters, logical bit 0 first.
pub fn to_bit_string(order: BitOrder, buf: &[u8], offset: usize, count: usize) -> Result<String> {
    check(buf.len(), offset, count)?;
    Ok((offset..offset + count)
        .map(|index| if read_bit(order, buf, index) { '1' } else { '0' })
        .collect())
}

/// Parses a `0`/`1` string into an aligned value buffer (inverse of
/// [`to_bit_string`] applied at [`value_offset`]).
pub fn from_bit_string(order: BitOrder, text: &str) -> Result<Vec<u8>> {
    let count = text.chars().count();
    let mut out = new_buffer(count);
    let start = value_offset(order, count);
    for (i, c) in text.chars().enumerate() {
        match c {
            '0' => {}
            '1' => write_bit(order, &mut out, start + i, true),
            other => return Err(BitSpanError::InvalidDigit(other)),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lengths() {
        assert_eq!(byte_len(0), 0);
        assert_eq!(byte_len(1), 1);
        assert_eq!(byte_len(8), 1);
        assert_eq!(byte_len(9), 2);
        assert_eq!(pad_len(12), 4);
        assert_eq!(pad_len(16), 0);
        assert_eq!(value_offset(BitOrder::Msb0, 12), 4);
        assert_eq!(value_offset(BitOrder::Lsb0, 12), 0);
        assert_eq!(new_buffer(17), vec![0, 0, 0]);
    }

    #[test]
    fn copy_msb0_across_bytes() {
        let src = [0b0000_0111u8, 0b1100_0000];
        let mut dst = [0u8; 1];
        copy_bits(BitOrder::Msb0, &src, 5, &mut dst, 0, 5).unwrap();
        assert_eq!(dst, [0b1111_1000]);
    }

    #[test]
    fn copy_lsb0_across_bytes() {
        let src = [0b1110_0000u8, 0b0000_0011];
        let mut dst = [0u8; 1];
        copy_bits(BitOrder::Lsb0, &src, 5, &mut dst, 0, 5).unwrap();
        assert_eq!(dst, [0b0001_1111]);
    }

    #[test]
    fn copy_preserves_surrounding_bits() {
        let src = [0x00u8];
        let mut dst = [0xFFu8];
        copy_bits(BitOrder::Msb0, &src, 0, &mut dst, 2, 3).unwrap();
        assert_eq!(dst, [0b1100_0111]);
    }

    #[test]
    fn aligned_fast_path_matches_bitwise() {
        let src = [0xDEu8, 0xAD, 0xBE, 0xEF];
        let mut fast = [0u8; 4];
        copy_bits(BitOrder::Lsb0, &src, 8, &mut fast, 0, 20).unwrap();
        let mut slow = [0u8; 4];
        for i in 0..20 {
            let b = bit(BitOrder::Lsb0, &src, 8 + i).unwrap();
            set_bit(BitOrder::Lsb0, &mut slow, i, b).unwrap();
        }
        assert_eq!(fast, slow);
    }

    #[test]
    fn out_of_range_is_rejected() {
        let src = [0u8; 2];
        let mut dst = [0u8; 1];
        assert_eq!(
            copy_bits(BitOrder::Msb0, &src, 0, &mut dst, 1, 8),
            Err(BitSpanError::OutOfRange {
                offset: 1,
                len: 8,
                capacity: 8
            })
        );
        assert!(sub_bits(BitOrder::Msb0, &src, 10, 7).is_err());
        assert!(invert_bits(BitOrder::Msb0, &mut dst, usize::MAX, 2).is_err());
    }

    #[test]
    fn invert_span_only() {
        let mut buf = [0u8; 2];
        invert_bits(BitOrder::Msb0, &mut buf, 6, 4).unwrap();
        assert_eq!(buf, [0b0000_0011, 0b1100_0000]);
        invert_bits(BitOrder::Msb0, &mut buf, 6, 4).unwrap();
        assert_eq!(buf, [0, 0]);
    }

    #[test]
    fn sub_bits_aligns_per_order() {
        let buf = [0b1010_1100u8];
        assert_eq!(sub_bits(BitOrder::Msb0, &buf, 0, 4).unwrap(), vec![0b0000_1010]);
        assert_eq!(sub_bits(BitOrder::Lsb0, &buf, 4, 4).unwrap(), vec![0b0000_1010]);
    }

    #[test]
    fn bit_strings() {
        let buf = [0b1010_0000u8];
        assert_eq!(to_bit_string(BitOrder::Msb0, &buf, 0, 4).unwrap(), "1010");
        assert_eq!(from_bit_string(BitOrder::Msb0, "1010").unwrap(), vec![0b0000_1010]);
        assert_eq!(from_bit_string(BitOrder::Lsb0, "0101").unwrap(), vec![0b0000_1010]);
        assert_eq!(
            from_bit_string(BitOrder::Msb0, "10x"),
            Err(BitSpanError::InvalidDigit('x'))
        );
    }

    #[test]
    fn zero_detection() {
        let buf = [0b0001_0000u8];
        assert!(is_zero(BitOrder::Msb0, &buf, 0, 3).unwrap());
        assert!(!is_zero(BitOrder::Msb0, &buf, 0, 4).unwrap());
    }
}
