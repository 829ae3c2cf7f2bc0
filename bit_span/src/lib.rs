//! # bit_span
//!
//! A `no_std` compatible toolkit for moving arbitrary bit spans between byte
//! buffers.
//!
//! ```rust
//! use bit_span::{BitOrder, copy_bits, new_buffer, sub_bits, to_bit_string};
//!
//! // A 12-bit value placed at bit 3 of a 3-byte record
//! let mut record = new_buffer(24);
//! let value = [0x0Au8, 0xBC]; // 0xABC, right-aligned in two bytes
//! copy_bits(BitOrder::Msb0, &value, 4, &mut record, 3, 12).unwrap();
//!
//! assert_eq!(sub_bits(BitOrder::Msb0, &record, 3, 12).unwrap(), vec![0x0A, 0xBC]);
//! assert_eq!(to_bit_string(BitOrder::Msb0, &record, 3, 4).unwrap(), "1010");
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod bit_ops;
pub mod error;
pub mod order;

pub use bit_ops::{
    bit, byte_len, copy_bits, from_bit_string, invert_bits, is_zero, new_buffer, pad_len,
    set_bit, sub_bits, to_bit_string, value_offset,
};
pub use error::BitSpanError;
pub use order::{BitOrder, ByteOrder};
