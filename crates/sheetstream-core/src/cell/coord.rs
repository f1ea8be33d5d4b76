//! Cell coordinate and rectangle types
//!
//! Coordinates are 1-based in both axes: column 1 is "A", row 1 is the
//! first row. Zero is not addressable, nor is anything past the last
//! column (XFD) or row of a worksheet.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A cell position (1-based column and row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    pub col: u32,
    pub row: u32,
}

impl CellCoord {
    /// Create a validated coordinate
    ///
    /// Columns run from 1 to [`MAX_COLS`](crate::MAX_COLS) and rows from 1
    /// to [`MAX_ROWS`](crate::MAX_ROWS); anything else is
    /// [`Error::InvalidCoordinate`].
    pub fn new(col: u32, row: u32) -> Result<Self> {
        if col == 0 || row == 0 || col > crate::MAX_COLS || row > crate::MAX_ROWS {
            return Err(Error::InvalidCoordinate { col, row });
        }
        Ok(Self { col, row })
    }

    /// Parse A1-style notation ("B3" is column 2, row 3)
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let split = s
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(s.len());
        let (letters, digits) = s.split_at(split);
        let invalid = || Error::InvalidRange(format!("invalid cell reference '{s}'"));

        let col = letters_to_column(letters).ok_or_else(invalid)?;
        let row: u32 = digits.parse().map_err(|_| invalid())?;
        Self::new(col, row)
    }

    /// A1-style notation
    pub fn to_a1_string(&self) -> String {
        format!("{}{}", column_to_letters(self.col), self.row)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_to_letters(self.col), self.row)
    }
}

impl FromStr for CellCoord {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Convert a 1-based column number to letters (1 = A, 27 = AA)
///
/// Returns an empty string for column 0.
pub fn column_to_letters(col: u32) -> String {
    let mut result = String::new();
    let mut n = col;

    while n > 0 {
        n -= 1;
        let c = ((n % 26) as u8 + b'A') as char;
        result.insert(0, c);
        n /= 26;
    }

    result
}

/// Convert column letters to a 1-based column number (A = 1, AA = 27)
pub fn letters_to_column(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }
    let mut col: u32 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = (c.to_ascii_uppercase() as u8 - b'A') as u32 + 1;
        col = col.checked_mul(26)?.checked_add(digit)?;
    }
    Some(col)
}

/// Inclusive rectangle of cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRect {
    /// Top-left corner
    pub start: CellCoord,
    /// Bottom-right corner
    pub end: CellCoord,
}

impl CellRect {
    /// Create a rectangle from its corner columns and rows
    ///
    /// Fails with [`Error::InvalidCoordinate`] for a corner outside the
    /// sheet and [`Error::InvalidRange`] when the start lies after the end
    /// on either axis. Ranges are not normalized.
    pub fn new(start_col: u32, start_row: u32, end_col: u32, end_row: u32) -> Result<Self> {
        Self::from_coords(CellCoord::new(start_col, start_row)?, CellCoord::new(end_col, end_row)?)
    }

    pub fn from_coords(start: CellCoord, end: CellCoord) -> Result<Self> {
        if start.col > end.col || start.row > end.row {
            return Err(Error::InvalidRange(format!(
                "{} lies after {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Rectangle covering a single cell
    pub fn single(coord: CellCoord) -> Self {
        Self {
            start: coord,
            end: coord,
        }
    }

    /// Parse "A1:C3" (or a single reference)
    pub fn parse(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some((start, end)) => Self::from_coords(CellCoord::parse(start)?, CellCoord::parse(end)?),
            None => CellCoord::parse(s).map(Self::single),
        }
    }

    /// Check if the rectangle contains a coordinate
    pub fn contains(&self, coord: CellCoord) -> bool {
        coord.row >= self.start.row
            && coord.row <= self.end.row
            && coord.col >= self.start.col
            && coord.col <= self.end.col
    }

    pub fn row_count(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    pub fn col_count(&self) -> u32 {
        self.end.col - self.start.col + 1
    }

    pub fn cell_count(&self) -> u64 {
        self.row_count() as u64 * self.col_count() as u64
    }

    /// Iterate over all coordinates in row-major order
    pub fn cells(&self) -> CellRectIter {
        CellRectIter {
            rect: *self,
            next: Some(self.start),
        }
    }
}

impl fmt::Display for CellRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}:{}", self.start, self.end)
        }
    }
}

impl FromStr for CellRect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Row-major iterator over the cells of a [`CellRect`]
#[derive(Debug, Clone)]
pub struct CellRectIter {
    rect: CellRect,
    next: Option<CellCoord>,
}

impl Iterator for CellRectIter {
    type Item = CellCoord;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;

        self.next = if current.col < self.rect.end.col {
            Some(CellCoord {
                col: current.col + 1,
                row: current.row,
            })
        } else if current.row < self.rect.end.row {
            Some(CellCoord {
                col: self.rect.start.col,
                row: current.row + 1,
            })
        } else {
            None
        };

        Some(current)
    }
}
