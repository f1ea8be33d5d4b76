//! # sheetstream-xlsx
//!
//! Streaming single-sheet XLSX encoder for sheetstream.
//!
//! [`XlsxStreamWriter`] implements [`StreamEncoder`](sheetstream_core::StreamEncoder)
//! and [`SheetLayout`](sheetstream_core::SheetLayout): rows are rendered to
//! sheet XML as they arrive, styles are collected into a cell format table,
//! and `write` packs everything into a zip archive.

mod error;
mod styles;
mod writer;

pub use error::{XlsxError, XlsxResult};
pub use writer::XlsxStreamWriter;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
