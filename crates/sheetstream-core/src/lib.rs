//! # sheetstream-core
//!
//! Core data structures for the sheetstream spreadsheet builder.
//!
//! This crate provides the pieces a builder session is made of:
//! - [`Style`] and [`StyleRegistry`] - Content-addressed style descriptors
//! - [`CellStore`] - Concurrent cell map with override conflict checks
//! - [`BorderRange`] and [`classify`] - Positional borders over a rectangle
//! - [`StreamEncoder`] - The row-oriented output the store is materialized into
//!
//! ## Example
//!
//! ```rust
//! use sheetstream_core::{CellCoord, CellStore, MemoryEncoder, StreamEncoder, Style};
//! use parking_lot::Mutex;
//!
//! let encoder = Mutex::new(MemoryEncoder::new());
//! let alloc = |style: &Style| {
//!     encoder
//!         .lock()
//!         .new_style(style)
//!         .map_err(sheetstream_core::Error::encoder)
//! };
//!
//! let store = CellStore::new();
//! let a1 = CellCoord::new(1, 1).unwrap();
//! store.set_value(a1, "Hello".into(), Some(&Style::new().bold()), false, false, &alloc).unwrap();
//!
//! // a second value without override is rejected
//! let err = store.set_value(a1, "World".into(), None, false, false, &alloc).unwrap_err();
//! assert!(err.is_value_conflict());
//! ```

pub mod border_range;
pub mod cell;
pub mod encoder;
pub mod error;
pub mod layout;
pub mod style;

pub use border_range::{classify, BorderRange, RangePosition};
pub use cell::{Bounds, Cell, CellCoord, CellRect, CellStore, CellValue, RowMap, SharedString};
pub use encoder::{MemoryEncoder, MemoryEncoderError, RowCell, SheetLayout, StreamEncoder};
pub use error::{Error, Result, SharedError};
pub use layout::{Orientation, PageLayout, PageMargins};

// Re-export all style types for convenience
pub use style::{
    merge_styles, Alignment, BorderEdge, BorderLineStyle, BorderSide, BorderStyle, Color,
    FillStyle, FontStyle, HorizontalAlignment, NumberFormat, PatternType, Protection,
    StoredStyle, Style, StyleAllocator, StyleHandle, StyleRegistry, Underline,
    VerticalAlignment,
};

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u32 = 16_384;
