//! Convenience re-exports for common usage

// Schema
pub use record_map::{
    BitOrder, ByteOrder, EnumItem, FieldDef, FieldKind, Map, MapBuilder, RecordDef, Version,
    ViewBuilder, ViewRecordBuilder,
};

// Storage
pub use record_source::{ImageSource, RecordSource, Source};

// Runtime
pub use record_data::{FieldValue, FormatConfig, RecordData, StoreData, ValueClass, ViewData};

// Errors
pub use record_data::DataError;
pub use record_map::{NotFound, SchemaError};
pub use record_source::SourceError;

#[cfg(feature = "crc")]
pub use record_crc::{CrcEvaluator, CrcInstance};
