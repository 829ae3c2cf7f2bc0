//! Field kinds and their kind-specific parameters.

use std::fmt;

/// Label used for an enumeration value that is not in the item table.
pub const INVALID_LABEL: &str = "Invalid";

/// Discriminant of a [`FieldKind`], without parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KindTag {
    Reserved,
    Boolean,
    Integer,
    Currency,
    Date,
    Time,
    BitArray,
    ByteArray,
    IntegerArray,
    Enumeration,
}

/// Inclusive bit-length bounds plus the required multiple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitLimits {
    pub min: usize,
    pub max: usize,
    pub modulo: usize,
}

impl BitLimits {
    const fn new(min: usize, max: usize, modulo: usize) -> Self {
        Self { min, max, modulo }
    }
}

impl KindTag {
    pub const fn limits(self) -> BitLimits {
        match self {
            KindTag::Reserved => BitLimits::new(1, usize::MAX, 1),
            KindTag::Boolean => BitLimits::new(1, 64, 1),
            KindTag::Integer => BitLimits::new(1, 64, 1),
            KindTag::Currency => BitLimits::new(1, 64, 1),
            KindTag::Date => BitLimits::new(1, 32, 1),
            KindTag::Time => BitLimits::new(11, 16, 1),
            KindTag::BitArray => BitLimits::new(1, usize::MAX, 1),
            KindTag::ByteArray => BitLimits::new(8, usize::MAX, 8),
            KindTag::IntegerArray => BitLimits::new(1, usize::MAX, 1),
            KindTag::Enumeration => BitLimits::new(1, 32, 1),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            KindTag::Reserved => "Reserved",
            KindTag::Boolean => "Boolean",
            KindTag::Integer => "Integer",
            KindTag::Currency => "Currency",
            KindTag::Date => "Date",
            KindTag::Time => "Time",
            KindTag::BitArray => "BitArray",
            KindTag::ByteArray => "ByteArray",
            KindTag::IntegerArray => "IntegerArray",
            KindTag::Enumeration => "Enumeration",
        }
    }
}

impl fmt::Display for KindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Preferred display radix of an Integer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Radix {
    #[default]
    Decimal,
    Hex,
}

/// One row of an enumeration's value/label table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumItem {
    pub value: i64,
    pub label: String,
}

impl EnumItem {
    pub fn new(value: i64, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }

    /// Sentinel returned when a decoded value has no table entry.
    pub fn invalid() -> Self {
        Self::new(-1, INVALID_LABEL)
    }

    pub fn is_invalid(&self) -> bool {
        self.value == -1 && self.label == INVALID_LABEL
    }
}

impl fmt::Display for EnumItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.value, self.label)
    }
}

/// The typed shape of a field, with its kind-specific parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Bits that must always read and be written as zero.
    Reserved,
    Boolean {
        true_label: String,
        false_label: String,
    },
    Integer {
        radix: Radix,
    },
    /// Integer number of cents.
    Currency,
    /// Day offset from 2000-01-01.
    Date,
    /// Minutes since midnight.
    Time,
    BitArray,
    ByteArray,
    /// `count` unsigned elements of `element_bits` bits, packed big-endian.
    IntegerArray {
        element_bits: usize,
        count: usize,
    },
    Enumeration {
        inverted: bool,
        items: Vec<EnumItem>,
    },
}

impl FieldKind {
    pub fn tag(&self) -> KindTag {
        match self {
            FieldKind::Reserved => KindTag::Reserved,
            FieldKind::Boolean { .. } => KindTag::Boolean,
            FieldKind::Integer { .. } => KindTag::Integer,
            FieldKind::Currency => KindTag::Currency,
            FieldKind::Date => KindTag::Date,
            FieldKind::Time => KindTag::Time,
            FieldKind::BitArray => KindTag::BitArray,
            FieldKind::ByteArray => KindTag::ByteArray,
            FieldKind::IntegerArray { .. } => KindTag::IntegerArray,
            FieldKind::Enumeration { .. } => KindTag::Enumeration,
        }
    }

    pub fn boolean() -> Self {
        FieldKind::Boolean {
            true_label: "True".to_string(),
            false_label: "False".to_string(),
        }
    }

    /// Looks up an enumeration item by value; `None` for other kinds or misses.
    pub fn enum_item(&self, value: i64) -> Option<&EnumItem> {
        match self {
            FieldKind::Enumeration { items, .. } => items.iter().find(|i| i.value == value),
            _ => None,
        }
    }
}

/// Minimal bit width able to index `count` distinct values.
pub(crate) fn bits_for_count(count: usize) -> usize {
    if count <= 1 {
        0
    } else {
        (usize::BITS - (count - 1).leading_zeros()) as usize
    }
}
