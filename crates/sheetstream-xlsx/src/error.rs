//! XLSX error types

use thiserror::Error;

/// Result type for XLSX operations
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Errors that can occur while encoding an XLSX package
#[derive(Debug, Error)]
pub enum XlsxError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Rows must be emitted in strictly increasing order
    #[error("row {row} emitted after row {previous}")]
    RowOrder { row: u32, previous: u32 },

    /// Row or column beyond the sheet limits
    #[error("cell out of range: column {col}, row {row}")]
    OutOfRange { col: u32, row: u32 },

    /// Row emitted after the row stream was flushed
    #[error("row stream already flushed")]
    Flushed,

    /// Sheet name rejected by Excel's naming rules
    #[error("invalid sheet name: {0}")]
    InvalidSheetName(String),
}
