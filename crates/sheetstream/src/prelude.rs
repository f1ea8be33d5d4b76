//! Prelude module for convenient imports
//!
//! ```rust
//! use sheetstream::prelude::*;
//! ```

pub use crate::{
    // Builder
    BuilderOptions,
    CsvExportOptions,
    Error,
    LineTerminator,
    Result,
    SheetBuilder,
};

pub use sheetstream_core::{
    // Cells
    Bounds,
    CellValue,
    // Styles
    Alignment,
    BorderEdge,
    BorderLineStyle,
    BorderRange,
    BorderStyle,
    Color,
    FillStyle,
    FontStyle,
    HorizontalAlignment,
    NumberFormat,
    Style,
    StyleHandle,
    VerticalAlignment,
    // Encoders
    MemoryEncoder,
    Orientation,
    PageLayout,
    PageMargins,
    SheetLayout,
    StreamEncoder,
};

pub use sheetstream_xlsx::XlsxStreamWriter;
