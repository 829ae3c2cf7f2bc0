use bit_span::BitSpanError;
use record_map::{KindTag, NotFound};
use record_source::SourceError;
use thiserror::Error;

/// A value that does not fit a field, or a failure below the data layer.
///
/// Every variant raised here names the field it concerns. Backend failures
/// are carried unchanged in [`DataError::Source`].
#[derive(Debug, Error)]
pub enum DataError {
    #[error("field {field:?} ({kind}) cannot {op} {found}")]
    TypeMismatch {
        field: String,
        kind: KindTag,
        /// `"accept"` on writes, `"be read as"` on reads.
        op: &'static str,
        found: &'static str,
    },

    #[error("field {field:?}: value {value} does not fit in {bits} bits")]
    Overflow {
        field: String,
        value: String,
        bits: usize,
    },

    #[error("field {field:?}: reserved bits must be zero")]
    ReservedNotZero { field: String },

    #[error("field {field:?}: cannot parse {text:?} as {expected}")]
    Parse {
        field: String,
        text: String,
        expected: &'static str,
    },

    #[error("{field:?}: expected {expected} {unit}, got {actual}")]
    Length {
        field: String,
        expected: usize,
        actual: usize,
        unit: &'static str,
    },

    #[error(transparent)]
    NotFound(#[from] NotFound),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Range(#[from] BitSpanError),
}

pub type Result<T> = std::result::Result<T, DataError>;
