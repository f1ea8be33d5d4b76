#![allow(dead_code)]

use std::io::{Seek, Write};

use sheetstream::prelude::{BorderEdge, BorderLineStyle, Color, MemoryEncoder, StreamEncoder, Style, StyleHandle};
use sheetstream_core::{MemoryEncoderError, RowCell};

pub fn thin() -> BorderEdge {
    BorderEdge::new(BorderLineStyle::Thin, Color::BLACK)
}

/// Values of an emitted row, empty slots as ""
pub fn row_values(encoder: &MemoryEncoder, row: u32) -> Vec<String> {
    encoder
        .row(row)
        .unwrap_or_else(|| panic!("row {row} was not emitted"))
        .iter()
        .map(|cell| cell.as_ref().map(|c| c.value.to_string()).unwrap_or_default())
        .collect()
}

/// Style registered for the cell at `col` of an emitted row
pub fn emitted_style(encoder: &MemoryEncoder, col: u32, row: u32) -> Option<Style> {
    let cell = encoder.row(row)?.get(col as usize - 1)?.as_ref()?;
    encoder.style(cell.style).cloned()
}

/// Memory encoder that rejects one row
#[derive(Debug)]
pub struct RejectRow {
    pub inner: MemoryEncoder,
    pub reject: u32,
}

impl RejectRow {
    pub fn new(reject: u32) -> Self {
        Self {
            inner: MemoryEncoder::new(),
            reject,
        }
    }
}

impl StreamEncoder for RejectRow {
    type Error = MemoryEncoderError;

    fn new_style(&mut self, style: &Style) -> Result<StyleHandle, Self::Error> {
        self.inner.new_style(style)
    }

    fn set_row(&mut self, row: u32, cells: &[Option<RowCell>]) -> Result<(), Self::Error> {
        if row == self.reject {
            return Err(MemoryEncoderError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("row {row} rejected"),
            )));
        }
        self.inner.set_row(row, cells)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.inner.flush()
    }

    fn write<W: Write + Seek>(&mut self, target: W) -> Result<(), Self::Error> {
        self.inner.write(target)
    }
}
