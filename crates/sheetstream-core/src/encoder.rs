//! Row-oriented output encoder traits
//!
//! A [`StreamEncoder`] receives the materialized sheet: styles first (one
//! call per distinct style), then rows in increasing order, then a flush
//! and the final write. [`SheetLayout`] adds the sheet-level settings that
//! are forwarded unchanged.

use std::fmt::Write as _;
use std::io::{Seek, Write};

use thiserror::Error;

use crate::cell::{CellRect, CellValue};
use crate::layout::{PageLayout, PageMargins};
use crate::style::{Style, StyleHandle};

/// One cell of an emitted row
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowCell {
    pub style: StyleHandle,
    pub value: CellValue,
}

impl RowCell {
    pub fn new(style: StyleHandle, value: CellValue) -> Self {
        Self { style, value }
    }
}

/// Streaming output encoder
pub trait StreamEncoder: Send {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Register a style and return its handle
    ///
    /// Handles must be non-zero; [`StyleHandle::NONE`] is reserved.
    fn new_style(&mut self, style: &Style) -> Result<StyleHandle, Self::Error>;

    /// Emit a row; `cells[i]` is column `i + 1`, `None` leaves it blank
    fn set_row(&mut self, row: u32, cells: &[Option<RowCell>]) -> Result<(), Self::Error>;

    /// Finish the row stream
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Write the encoded output
    fn write<W: Write + Seek>(&mut self, target: W) -> Result<(), Self::Error>;
}

/// Sheet-level settings an encoder can carry
pub trait SheetLayout: StreamEncoder {
    /// Set the width of columns `min_col..=max_col`
    fn set_col_width(&mut self, min_col: u32, max_col: u32, width: f64) -> Result<(), Self::Error>;

    fn merge_cells(&mut self, rect: CellRect) -> Result<(), Self::Error>;

    fn set_page_margins(&mut self, margins: PageMargins) -> Result<(), Self::Error>;

    fn set_page_layout(&mut self, layout: PageLayout) -> Result<(), Self::Error>;

    fn page_layout(&self) -> PageLayout;
}

/// Errors of [`MemoryEncoder`]
#[derive(Debug, Error)]
pub enum MemoryEncoderError {
    #[error("style table is full ({0} styles)")]
    StyleLimit(usize),

    #[error("row {row} emitted after row {previous}")]
    RowOrder { row: u32, previous: u32 },

    #[error("rows emitted after flush")]
    Flushed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Encoder that keeps everything in memory
///
/// Useful for inspecting what a builder emits. `write` renders the rows as
/// tab-separated text, one line per emitted row, prefixed with the row
/// number.
#[derive(Debug, Default)]
pub struct MemoryEncoder {
    styles: Vec<Style>,
    style_limit: Option<usize>,
    rows: Vec<(u32, Vec<Option<RowCell>>)>,
    col_widths: Vec<(u32, u32, f64)>,
    merges: Vec<CellRect>,
    margins: Option<PageMargins>,
    layout: PageLayout,
    flushed: bool,
}

impl MemoryEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail `new_style` once `limit` styles are registered
    pub fn with_style_limit(limit: usize) -> Self {
        Self {
            style_limit: Some(limit),
            ..Self::default()
        }
    }

    /// Registered styles; handle `n` is `styles()[n - 1]`
    pub fn styles(&self) -> &[Style] {
        &self.styles
    }

    /// Style registered under `handle`
    pub fn style(&self, handle: StyleHandle) -> Option<&Style> {
        (handle.get() as usize)
            .checked_sub(1)
            .and_then(|i| self.styles.get(i))
    }

    /// Emitted rows in emission order
    pub fn rows(&self) -> &[(u32, Vec<Option<RowCell>>)] {
        &self.rows
    }

    /// Cells of an emitted row
    pub fn row(&self, row: u32) -> Option<&[Option<RowCell>]> {
        self.rows
            .iter()
            .find(|(r, _)| *r == row)
            .map(|(_, cells)| cells.as_slice())
    }

    pub fn col_widths(&self) -> &[(u32, u32, f64)] {
        &self.col_widths
    }

    pub fn merges(&self) -> &[CellRect] {
        &self.merges
    }

    pub fn page_margins(&self) -> Option<PageMargins> {
        self.margins
    }

    pub fn is_flushed(&self) -> bool {
        self.flushed
    }

    fn render(&self) -> String {
        let mut out = String::new();
        for (row, cells) in &self.rows {
            let _ = write!(out, "{row}");
            for cell in cells {
                out.push('\t');
                if let Some(cell) = cell {
                    let _ = write!(out, "{}", cell.value);
                }
            }
            out.push('\n');
        }
        out
    }
}

impl StreamEncoder for MemoryEncoder {
    type Error = MemoryEncoderError;

    fn new_style(&mut self, style: &Style) -> Result<StyleHandle, Self::Error> {
        if let Some(limit) = self.style_limit {
            if self.styles.len() >= limit {
                return Err(MemoryEncoderError::StyleLimit(limit));
            }
        }
        self.styles.push(style.clone());
        Ok(StyleHandle::new(self.styles.len() as u32))
    }

    fn set_row(&mut self, row: u32, cells: &[Option<RowCell>]) -> Result<(), Self::Error> {
        if self.flushed {
            return Err(MemoryEncoderError::Flushed);
        }
        if let Some((previous, _)) = self.rows.last() {
            if row <= *previous {
                return Err(MemoryEncoderError::RowOrder {
                    row,
                    previous: *previous,
                });
            }
        }
        self.rows.push((row, cells.to_vec()));
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.flushed = true;
        Ok(())
    }

    fn write<W: Write + Seek>(&mut self, mut target: W) -> Result<(), Self::Error> {
        if !self.flushed {
            self.flush()?;
        }
        target.write_all(self.render().as_bytes())?;
        target.flush()?;
        Ok(())
    }
}

impl SheetLayout for MemoryEncoder {
    fn set_col_width(&mut self, min_col: u32, max_col: u32, width: f64) -> Result<(), Self::Error> {
        self.col_widths.push((min_col, max_col, width));
        Ok(())
    }

    fn merge_cells(&mut self, rect: CellRect) -> Result<(), Self::Error> {
        self.merges.push(rect);
        Ok(())
    }

    fn set_page_margins(&mut self, margins: PageMargins) -> Result<(), Self::Error> {
        self.margins = Some(margins);
        Ok(())
    }

    fn set_page_layout(&mut self, layout: PageLayout) -> Result<(), Self::Error> {
        self.layout = layout;
        Ok(())
    }

    fn page_layout(&self) -> PageLayout {
        self.layout
    }
}
