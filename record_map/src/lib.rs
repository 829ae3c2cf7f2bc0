//! # record_map
//!
//! Validated, immutable schemas of fixed-format binary records.
//!
//! A [`Map`] names its records, each record's typed fields and the bit
//! pieces they occupy, plus a main view (the physical layout) and any
//! number of alternative views that re-project the same fields.
//!
//! ```rust
//! use record_map::{EnumItem, FieldDef, MapBuilder, RecordDef, ViewBuilder, ViewRecordBuilder};
//!
//! let map = MapBuilder::new("Card")
//!     .record(
//!         RecordDef::new("Status")
//!             .field(FieldDef::enumeration(
//!                 "mode",
//!                 2,
//!                 [EnumItem::new(0, "Off"), EnumItem::new(1, "On"), EnumItem::new(2, "Auto")],
//!             ))
//!             .field(FieldDef::reserved(6))
//!             .field(FieldDef::integer("count", 8)),
//!     )
//!     .view(
//!         ViewBuilder::new("Wire").record(
//!             ViewRecordBuilder::new("Status").field("count").field("mode").reserved(6),
//!         ),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let status = map.record("Status").unwrap();
//! assert_eq!(status.bit_len(), 16);
//! assert!(map.field("Status", "RUF_2").unwrap().is_reserved());
//!
//! let wire = map.view("Wire").unwrap().record("Status").unwrap();
//! assert_eq!(wire.item("mode").unwrap().offset(), 8);
//! assert_eq!(wire.item("ZERO_10").unwrap().bit_len(), 6);
//! ```

mod builder;
mod engage;
pub mod error;
mod field;
mod ids;
pub mod kind;
mod map;
mod piece;
mod record;
mod sequence;
mod validate;
mod view;

pub use bit_span::{BitOrder, ByteOrder};
pub use builder::{FieldDef, MapBuilder, RecordDef, ViewBuilder, ViewRecordBuilder};
pub use error::{NotFound, SchemaError};
pub use field::Field;
pub use ids::{FieldId, RecordId, ViewId};
pub use kind::{BitLimits, EnumItem, FieldKind, INVALID_LABEL, KindTag, Radix};
pub use map::{Map, Version};
pub use piece::{Piece, PieceOwner};
pub use record::Record;
pub use sequence::FieldSequence;
pub use view::{View, ViewItem, ViewItemKind, ViewRecord};
