//! Positional borders over a rectangle
//!
//! A [`BorderRange`] describes the outline of a rectangle (top, bottom,
//! left, right) plus the lines drawn between its cells (inside). Which of
//! those a single cell receives depends only on where the cell sits in the
//! rectangle, so the computation is a pure function of
//! `(rect, coord, range)`.

use crate::cell::{CellCoord, CellRect};
use crate::style::{BorderEdge, BorderLineStyle, BorderSide, BorderStyle, Color};

/// Border specification for a rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BorderRange {
    pub top: Option<BorderEdge>,
    pub bottom: Option<BorderEdge>,
    pub left: Option<BorderEdge>,
    pub right: Option<BorderEdge>,
    /// Lines between cells of the rectangle
    pub inside: Option<BorderEdge>,
}

impl BorderRange {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outline on all four outer edges, nothing inside
    pub fn outline(style: BorderLineStyle, color: Color) -> Self {
        let edge = Some(BorderEdge::new(style, color));
        Self {
            top: edge,
            bottom: edge,
            left: edge,
            right: edge,
            inside: None,
        }
    }

    /// Same line on every outer edge and between all cells
    pub fn grid(style: BorderLineStyle, color: Color) -> Self {
        Self {
            inside: Some(BorderEdge::new(style, color)),
            ..Self::outline(style, color)
        }
    }

    pub fn with_top(mut self, style: BorderLineStyle, color: Color) -> Self {
        self.top = Some(BorderEdge::new(style, color));
        self
    }

    pub fn with_bottom(mut self, style: BorderLineStyle, color: Color) -> Self {
        self.bottom = Some(BorderEdge::new(style, color));
        self
    }

    pub fn with_left(mut self, style: BorderLineStyle, color: Color) -> Self {
        self.left = Some(BorderEdge::new(style, color));
        self
    }

    pub fn with_right(mut self, style: BorderLineStyle, color: Color) -> Self {
        self.right = Some(BorderEdge::new(style, color));
        self
    }

    pub fn with_inside(mut self, style: BorderLineStyle, color: Color) -> Self {
        self.inside = Some(BorderEdge::new(style, color));
        self
    }

    /// Outer edge spec for a side of the rectangle
    fn outer(&self, side: BorderSide) -> Option<BorderEdge> {
        match side {
            BorderSide::Top => self.top,
            BorderSide::Bottom => self.bottom,
            BorderSide::Left => self.left,
            BorderSide::Right => self.right,
        }
    }
}

/// Position class of a cell inside a rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangePosition {
    TopLeft,
    Top,
    TopRight,
    Left,
    Interior,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl RangePosition {
    /// Classify `coord` relative to `rect`
    ///
    /// Classes are tested in the order TopLeft, Top, TopRight, Left,
    /// BottomLeft, Bottom, BottomRight, Right and the first match wins, which
    /// settles single-row and single-column rectangles: a 1x1 rectangle is
    /// TopLeft, the last cell of a single row is TopRight and the last cell
    /// of a single column is BottomLeft. Anything else is Interior.
    ///
    /// `coord` is expected to lie inside `rect`.
    pub fn locate(rect: &CellRect, coord: CellCoord) -> Self {
        let (first_row, last_row) = (coord.row == rect.start.row, coord.row == rect.end.row);
        let (first_col, last_col) = (coord.col == rect.start.col, coord.col == rect.end.col);
        let mid_row = coord.row > rect.start.row && coord.row < rect.end.row;
        let mid_col = coord.col > rect.start.col && coord.col < rect.end.col;

        if first_row && first_col {
            RangePosition::TopLeft
        } else if first_row && mid_col {
            RangePosition::Top
        } else if first_row && last_col {
            RangePosition::TopRight
        } else if mid_row && first_col {
            RangePosition::Left
        } else if last_row && first_col {
            RangePosition::BottomLeft
        } else if last_row && mid_col {
            RangePosition::Bottom
        } else if last_row && last_col {
            RangePosition::BottomRight
        } else if mid_row && last_col {
            RangePosition::Right
        } else {
            RangePosition::Interior
        }
    }

    /// Sides that lie on the rectangle's outline for this class
    pub fn outer_sides(self) -> &'static [BorderSide] {
        use BorderSide::*;
        match self {
            RangePosition::TopLeft => &[Top, Left],
            RangePosition::Top => &[Top],
            RangePosition::TopRight => &[Top, Right],
            RangePosition::Left => &[Left],
            RangePosition::Interior => &[],
            RangePosition::Right => &[Right],
            RangePosition::BottomLeft => &[Bottom, Left],
            RangePosition::Bottom => &[Bottom],
            RangePosition::BottomRight => &[Bottom, Right],
        }
    }
}

/// Border set a cell receives from a [`BorderRange`]
///
/// Outer sides get the matching outline spec, every other side gets the
/// inside spec. Unset specs contribute nothing, so the result may be empty.
pub fn classify(rect: &CellRect, coord: CellCoord, range: &BorderRange) -> BorderStyle {
    let outer = RangePosition::locate(rect, coord).outer_sides();

    let mut border = BorderStyle::new();
    for side in BorderSide::ALL {
        let edge = if outer.contains(&side) {
            range.outer(side)
        } else {
            range.inside
        };
        border.set_edge(side, edge);
    }
    border
}
