//! Error types for sheetstream

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by [`SheetBuilder`](crate::SheetBuilder)
#[derive(Debug, Error)]
pub enum Error {
    /// Conflict, invalid coordinate, encoder failure or task panic
    #[error(transparent)]
    Core(#[from] sheetstream_core::Error),

    /// XLSX encoder could not be created
    #[error("XLSX error: {0}")]
    Xlsx(#[from] sheetstream_xlsx::XlsxError),

    /// CSV export error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Dedicated worker pool could not be started
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// The session state is still referenced after all tasks finished
    #[error("builder session is still shared")]
    SessionShared,
}

impl Error {
    /// True when a value would have been overwritten without override
    pub fn is_value_conflict(&self) -> bool {
        matches!(self, Error::Core(e) if e.is_value_conflict())
    }

    /// True when a style would have been overwritten without override
    pub fn is_style_conflict(&self) -> bool {
        matches!(self, Error::Core(e) if e.is_style_conflict())
    }

    /// The underlying core error, if any
    pub fn as_core(&self) -> Option<&sheetstream_core::Error> {
        match self {
            Error::Core(e) => Some(e),
            _ => None,
        }
    }
}
