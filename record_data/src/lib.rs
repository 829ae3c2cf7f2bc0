//! # record_data
//!
//! Typed access to live record data. A [`StoreData`] binds every view of a
//! [`record_map::Map`] to a [`record_source::Source`]; each
//! [`RecordData`] then reads and writes its items as native values, text,
//! or aligned bit buffers.
//!
//! Conversions are whitelisted per field kind: a boolean accepts `bool`,
//! integers and its labels, a date accepts dates and `dd/mm/yyyy` text,
//! and so on. Anything else is a [`DataError::TypeMismatch`].

pub mod bits;
mod error;
mod format;
mod item;
mod kinds;
mod record;
mod store;
mod value;
mod view;

pub use error::{DataError, Result};
pub use format::{DATE_PATTERN, FormatConfig, TIME_PATTERN};
pub use item::{ItemData, ItemMut, ItemRef};
pub use record::RecordData;
pub use store::StoreData;
pub use value::{FieldValue, ValueClass};
pub use view::ViewData;
