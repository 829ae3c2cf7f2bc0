//! Byte-order and bit-order flags.

/// Which physical bit of a byte is logical bit 0 of a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BitOrder {
    /// Logical bit 0 is the least-significant bit of the first byte.
    Lsb0,
    /// Logical bit 0 is the most-significant bit of the first byte.
    #[default]
    Msb0,
}

impl BitOrder {
    #[inline]
    pub const fn from_little(little: bool) -> Self {
        if little { BitOrder::Lsb0 } else { BitOrder::Msb0 }
    }

    #[inline]
    pub const fn is_little(self) -> bool {
        matches!(self, BitOrder::Lsb0)
    }

    /// Physical bit (0 = least significant) holding logical bit `index % 8`.
    #[inline(always)]
    pub(crate) const fn shift(self, index: usize) -> u32 {
        match self {
            BitOrder::Lsb0 => (index % 8) as u32,
            BitOrder::Msb0 => 7 - (index % 8) as u32,
        }
    }
}

/// Byte order used to serialise multi-byte integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ByteOrder {
    Little,
    #[default]
    Big,
}

impl ByteOrder {
    #[inline]
    pub const fn from_little(little: bool) -> Self {
        if little { ByteOrder::Little } else { ByteOrder::Big }
    }

    #[inline]
    pub const fn is_little(self) -> bool {
        matches!(self, ByteOrder::Little)
    }

    /// Index of the most significant byte in a `len`-byte integer.
    #[inline]
    pub const fn most_significant(self, len: usize) -> usize {
        match self {
            ByteOrder::Little => len.saturating_sub(1),
            ByteOrder::Big => 0,
        }
    }
}
