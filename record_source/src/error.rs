use bit_span::BitSpanError;
use record_map::NotFound;
use thiserror::Error;

/// Failures raised by a storage backend.
///
/// The first five variants are the backend failure categories; callers pass
/// them through unchanged.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Backend misconfigured, or bound to an image of another map.
    #[error("setup error: {0}")]
    Setup(String),

    /// The medium itself is unreadable or corrupt.
    #[error("device error: {0}")]
    Device(String),

    /// The source was closed or the connection dropped.
    #[error("session error: {0}")]
    Session(String),

    #[error("authentication error: {0}")]
    Authentication(String),

    /// The operation is not permitted on this medium.
    #[error("access error: {0}")]
    Access(String),

    #[error("device I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    NotFound(#[from] NotFound),

    #[error(transparent)]
    Range(#[from] BitSpanError),
}

pub type Result<T> = std::result::Result<T, SourceError>;
