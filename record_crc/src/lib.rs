//! # record_crc
//!
//! CRC-16/BUYPASS protection for runs of items inside a record. Any item
//! named `crc`, optionally followed by digits, holds the big-endian CRC of
//! the items laid out before it since the previous CRC item.

pub mod crc16;
mod evaluator;

pub use crc16::crc16;
pub use evaluator::{CRC_BITS, CrcEvaluator, CrcInstance, is_crc_name};
