//! # record_source
//!
//! The storage seam of the record codec. A [`Source`] hands out
//! [`RecordSource`]s, and a record source moves single pieces of bits
//! between the medium and caller buffers. Nothing above this seam touches
//! bytes on the medium directly.
//!
//! [`ImageSource`] is the provided backend: a contiguous byte image kept in
//! memory, in a file, or (feature `mmap`) in a memory-mapped file.

pub mod digest;
pub mod error;
pub mod image;
pub mod source;
mod storage;

pub use error::{Result, SourceError};
pub use image::{FORMAT_VERSION, HEADER_LEN, ImageHeader, ImageSource, MAGIC, MEDIA_ID_LEN, RecordWindow};
pub use source::{RecordSource, Source};
