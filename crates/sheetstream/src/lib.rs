//! # sheetstream
//!
//! Build a styled worksheet from many threads at once, then stream it out
//! row by row.
//!
//! Cells are accumulated in a concurrent store keyed by coordinate. Styles
//! are deduplicated by content, so equal styles share one encoder handle.
//! Writes to a cell that already holds a value or style must opt into
//! overriding. Style overrides merge borders edge by edge, so an outline
//! drawn over already-bordered cells keeps their other edges.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sheetstream::prelude::*;
//!
//! let builder = SheetBuilder::xlsx("Report")?;
//!
//! let header = Style::new().bold().fill_color(Color::GRAY);
//! builder.set_cell_value(1, 1, "Item", Some(&header), false, false)?;
//! builder.set_cell_value(2, 1, "Amount", Some(&header), false, false)?;
//!
//! for row in 2..=100 {
//!     builder.set_cell_value_async(1, row, format!("item {row}"), None, false);
//!     builder.set_cell_value_async(2, row, f64::from(row) * 1.5, None, false);
//! }
//!
//! builder.set_border_range(1, 1, 2, 100, &BorderRange::grid(BorderLineStyle::Thin, Color::BLACK), true)?;
//! builder.set_col_width(1, 20.0)?;
//! builder.save("report.xlsx")?;
//! # Ok::<(), sheetstream::Error>(())
//! ```
//!
//! ## Crate Structure
//!
//! - [`sheetstream_core`] - Cells, styles, the store and the encoder traits
//! - [`sheetstream_xlsx`] - Streaming XLSX encoder

pub mod builder;
pub mod error;
pub mod options;
pub mod prelude;

mod materialize;
mod tasks;

pub use builder::SheetBuilder;
pub use error::{Error, Result};
pub use options::{BuilderOptions, CsvExportOptions, LineTerminator};

// Re-export the building blocks
pub use sheetstream_core::{
    BorderEdge, BorderLineStyle, BorderRange, BorderStyle, Bounds, Cell, CellValue, Color,
    MemoryEncoder, PageLayout, PageMargins, SheetLayout, StreamEncoder, Style, StyleHandle,
};
pub use sheetstream_xlsx::XlsxStreamWriter;
