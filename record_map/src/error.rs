use thiserror::Error;

use crate::kind::KindTag;

/// A malformed or inconsistent schema definition.
///
/// Raised only while a [`crate::Map`] is being built; a map that exists has
/// passed every rule below.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("map {0:?}: name must not be empty")]
    EmptyName(String),

    #[error("map {map:?}: duplicate record {record:?}")]
    DuplicateRecord { map: String, record: String },

    #[error("map {map:?}: duplicate view {view:?}")]
    DuplicateView { map: String, view: String },

    #[error("record {record:?}: duplicate field {field:?}")]
    DuplicateField { record: String, field: String },

    #[error("record {0:?} has no fields")]
    EmptyRecord(String),

    #[error("record {record:?}: declared {declared} bits but fields sum to {actual}")]
    RecordLength {
        record: String,
        declared: usize,
        actual: usize,
    },

    #[error("field {record}.{field} ({kind}): {bits} bits outside {min}..={max}")]
    BitLength {
        record: String,
        field: String,
        kind: KindTag,
        bits: usize,
        min: usize,
        max: usize,
    },

    #[error("field {record}.{field} ({kind}): {bits} bits is not a multiple of {modulo}")]
    BitModulo {
        record: String,
        field: String,
        kind: KindTag,
        bits: usize,
        modulo: usize,
    },

    #[error("field {record}.{field}: pieces cover {pieces} bits, field declares {bits}")]
    PieceLength {
        record: String,
        field: String,
        pieces: usize,
        bits: usize,
    },

    #[error("field {record}.{field}: piece {offset}+{len} lies outside the {record_bits}-bit record")]
    PieceOutOfRecord {
        record: String,
        field: String,
        offset: usize,
        len: usize,
        record_bits: usize,
    },

    #[error("record {record:?}: field {field:?} runs past the addressable bit range")]
    LayoutOverflow { record: String, field: String },

    #[error("record {record:?}: pieces of {first:?} and {second:?} overlap at bit {offset}")]
    PieceOverlap {
        record: String,
        first: String,
        second: String,
        offset: usize,
    },

    #[error("field {record}.{field}: true and false labels must differ, both are {label:?}")]
    BooleanLabels {
        record: String,
        field: String,
        label: String,
    },

    #[error("field {record}.{field}: {items} enumeration items need at least {needed} bits, field has {bits}")]
    EnumTooNarrow {
        record: String,
        field: String,
        items: usize,
        needed: usize,
        bits: usize,
    },

    #[error("field {record}.{field}: duplicate enumeration value {value}")]
    EnumDuplicateValue {
        record: String,
        field: String,
        value: i64,
    },

    #[error("field {record}.{field}: duplicate enumeration label {label:?}")]
    EnumDuplicateLabel {
        record: String,
        field: String,
        label: String,
    },

    #[error("field {record}.{field}: enumeration has no items")]
    EnumEmpty { record: String, field: String },

    #[error("field {record}.{field}: {count} elements of {element_bits} bits do not fill {bits} bits")]
    ArrayShape {
        record: String,
        field: String,
        element_bits: usize,
        count: usize,
        bits: usize,
    },

    #[error("view {view:?}: unknown record {record:?}")]
    UnknownRecord { view: String, record: String },

    #[error("view {view:?}: record {record:?} has no field {field:?}")]
    UnknownField {
        view: String,
        record: String,
        field: String,
    },

    #[error("view {view:?}: field {record}.{field} listed twice")]
    DuplicateViewItem {
        view: String,
        record: String,
        field: String,
    },

    #[error("view {view:?}: field {record}.{field} re-declared with {bits} bits, schema field has {field_bits}")]
    ViewFieldWidth {
        view: String,
        record: String,
        field: String,
        bits: usize,
        field_bits: usize,
    },

    /// A narrowed view item that breaks a rule of its field's kind.
    #[error("view {view:?}: {error}")]
    ViewItemRule {
        view: String,
        #[source]
        error: Box<SchemaError>,
    },

    #[error("view {view:?}: record {record:?} items sum to {actual} bits, view record spans {declared}")]
    ViewRecordLength {
        view: String,
        record: String,
        declared: usize,
        actual: usize,
    },
}

/// A name-indexed lookup that found nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{what} {name:?} not found in {container:?}")]
pub struct NotFound {
    /// What was searched for (`"record"`, `"view"`, `"field"`, ...).
    pub what: &'static str,
    pub name: String,
    /// Name of the map, record or view that was searched.
    pub container: String,
}

impl NotFound {
    pub fn new(what: &'static str, name: impl Into<String>, container: impl Into<String>) -> Self {
        Self {
            what,
            name: name.into(),
            container: container.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SchemaError>;
