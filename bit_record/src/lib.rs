//! # Bit Record
//!
//! Schema-driven access to fixed-format binary records.
//!
//! ## Layers
//!
//! - [`span`]: bit-span copy, invert, compare and render over byte buffers
//! - [`map`]: validated record schemas with views and piece layouts
//! - [`source`]: the storage seam and the image backend
//! - [`data`]: typed get/set over live records
//! - [`crc`]: CRC-16 protection of item runs (feature `crc`)
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use bit_record::prelude::*;
//!
//! let map = Arc::new(
//!     MapBuilder::new("Card")
//!         .record(
//!             RecordDef::new("Header")
//!                 .field(FieldDef::boolean("flag"))
//!                 .field(FieldDef::integer("code", 7))
//!                 .field(FieldDef::byte_array("crc", 16)),
//!         )
//!         .build()?,
//! );
//!
//! let source = ImageSource::in_memory(&map);
//! let mut store = StoreData::new(map, source)?;
//! let header = store.record_mut("Header")?;
//!
//! header.set("flag", true)?;
//! header.set("code", 42)?;
//!
//! let crc = CrcEvaluator::new(header)?;
//! crc.update(header)?;
//! assert!(crc.validate(header)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod prelude;

pub use bit_span as span;
#[cfg(feature = "crc")]
pub use record_crc as crc;
pub use record_data as data;
pub use record_map as map;
pub use record_source as source;

pub use record_data::{DataError, FieldValue, StoreData, ValueClass};
pub use record_map::{Map, MapBuilder, SchemaError};
pub use record_source::{ImageSource, SourceError};
