//! Error types for sheetstream-core

use std::sync::Arc;

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Error coming from a stream encoder, shared so [`Error`] stays `Clone`
pub type SharedError = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while accumulating cells and styles
///
/// Cloning is cheap; a background failure is reported to every later
/// caller of the same session.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// A non-empty value would replace a non-empty value without override
    #[error("cell value at column {col}, row {row} is already set")]
    ValueOverrideConflict { col: u32, row: u32 },

    /// A style would replace an existing style without override
    #[error("cell style at column {col}, row {row} is already set")]
    StyleOverrideConflict { col: u32, row: u32 },

    /// The stream encoder rejected a call (style allocation, row emission, flush, write)
    #[error("encoder error: {0}")]
    Encoder(#[source] SharedError),

    /// Coordinates are 1-based; zero is not addressable
    #[error("invalid cell coordinate: column {col}, row {row}")]
    InvalidCoordinate { col: u32, row: u32 },

    /// Range start lies after its end
    #[error("invalid cell range: {0}")]
    InvalidRange(String),

    /// A background task panicked before finishing
    #[error("background task panicked: {0}")]
    TaskPanicked(String),
}

impl Error {
    /// Wrap an encoder error, keeping it as the error source
    pub fn encoder<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Encoder(Arc::new(err))
    }

    /// True for [`Error::ValueOverrideConflict`]
    pub fn is_value_conflict(&self) -> bool {
        matches!(self, Error::ValueOverrideConflict { .. })
    }

    /// True for [`Error::StyleOverrideConflict`]
    pub fn is_style_conflict(&self) -> bool {
        matches!(self, Error::StyleOverrideConflict { .. })
    }
}
