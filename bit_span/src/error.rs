#[cfg(feature = "std")]
use thiserror::Error;

/// Errors raised by bit-span operations.
#[cfg_attr(feature = "std", derive(Error))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BitSpanError {
    #[cfg_attr(
        feature = "std",
        error("bit range {offset}+{len} exceeds buffer capacity of {capacity} bits")
    )]
    OutOfRange {
        offset: usize,
        len: usize,
        capacity: usize,
    },

    #[cfg_attr(feature = "std", error("invalid bit digit {0:?}, expected '0' or '1'"))]
    InvalidDigit(char),
}

#[cfg(not(feature = "std"))]
impl core::fmt::Display for BitSpanError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BitSpanError::OutOfRange {
                offset,
                len,
                capacity,
            } => write!(
                f,
                "bit range {}+{} exceeds buffer capacity of {} bits",
                offset, len, capacity
            ),
            BitSpanError::InvalidDigit(c) => {
                write!(f, "invalid bit digit {:?}, expected '0' or '1'", c)
            }
        }
    }
}
