//! Border style types

use super::Color;

/// One of the four edges of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BorderSide {
    Top,
    Bottom,
    Left,
    Right,
}

impl BorderSide {
    /// All sides in the order they are merged and written
    pub const ALL: [BorderSide; 4] = [
        BorderSide::Top,
        BorderSide::Bottom,
        BorderSide::Left,
        BorderSide::Right,
    ];
}

/// Per-edge border settings of a cell
///
/// Each edge is independent: an edge that is `None` is simply not drawn.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BorderStyle {
    pub top: Option<BorderEdge>,
    pub bottom: Option<BorderEdge>,
    pub left: Option<BorderEdge>,
    pub right: Option<BorderEdge>,
}

impl BorderStyle {
    /// Create a border style with no edges
    pub fn new() -> Self {
        Self::default()
    }

    /// All four edges with the same line and color
    pub fn all(style: BorderLineStyle, color: Color) -> Self {
        let edge = Some(BorderEdge::new(style, color));
        Self {
            top: edge,
            bottom: edge,
            left: edge,
            right: edge,
        }
    }

    /// Set the top border
    pub fn with_top(mut self, style: BorderLineStyle, color: Color) -> Self {
        self.top = Some(BorderEdge::new(style, color));
        self
    }

    /// Set the bottom border
    pub fn with_bottom(mut self, style: BorderLineStyle, color: Color) -> Self {
        self.bottom = Some(BorderEdge::new(style, color));
        self
    }

    /// Set the left border
    pub fn with_left(mut self, style: BorderLineStyle, color: Color) -> Self {
        self.left = Some(BorderEdge::new(style, color));
        self
    }

    /// Set the right border
    pub fn with_right(mut self, style: BorderLineStyle, color: Color) -> Self {
        self.right = Some(BorderEdge::new(style, color));
        self
    }

    /// Edge on the given side
    pub fn edge(&self, side: BorderSide) -> Option<BorderEdge> {
        match side {
            BorderSide::Top => self.top,
            BorderSide::Bottom => self.bottom,
            BorderSide::Left => self.left,
            BorderSide::Right => self.right,
        }
    }

    /// Replace the edge on the given side
    pub fn set_edge(&mut self, side: BorderSide, edge: Option<BorderEdge>) {
        match side {
            BorderSide::Top => self.top = edge,
            BorderSide::Bottom => self.bottom = edge,
            BorderSide::Left => self.left = edge,
            BorderSide::Right => self.right = edge,
        }
    }

    /// Check if no edge is set
    pub fn is_empty(&self) -> bool {
        BorderSide::ALL.iter().all(|side| self.edge(*side).is_none())
    }

    /// Drop edges that would not draw anything
    pub(crate) fn canonical(&self) -> Self {
        let mut out = Self::default();
        for side in BorderSide::ALL {
            let edge = self.edge(side).filter(|e| e.style != BorderLineStyle::None);
            out.set_edge(side, edge);
        }
        out
    }
}

/// A single border edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BorderEdge {
    pub style: BorderLineStyle,
    pub color: Color,
}

impl BorderEdge {
    /// Create a new border edge
    pub fn new(style: BorderLineStyle, color: Color) -> Self {
        Self { style, color }
    }

    /// Thin black edge
    pub fn thin() -> Self {
        Self::new(BorderLineStyle::Thin, Color::BLACK)
    }
}

/// Border line styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BorderLineStyle {
    /// No border
    #[default]
    None,
    Thin,
    Medium,
    Thick,
    Dashed,
    Dotted,
    Double,
    /// Very thin line
    Hair,
    MediumDashed,
    DashDot,
    MediumDashDot,
    DashDotDot,
    MediumDashDotDot,
    SlantDashDot,
}

impl BorderLineStyle {
    /// OOXML name of the line style, `None` for no line
    pub fn as_ooxml(&self) -> Option<&'static str> {
        match self {
            BorderLineStyle::None => None,
            BorderLineStyle::Thin => Some("thin"),
            BorderLineStyle::Medium => Some("medium"),
            BorderLineStyle::Thick => Some("thick"),
            BorderLineStyle::Dashed => Some("dashed"),
            BorderLineStyle::Dotted => Some("dotted"),
            BorderLineStyle::Double => Some("double"),
            BorderLineStyle::Hair => Some("hair"),
            BorderLineStyle::MediumDashed => Some("mediumDashed"),
            BorderLineStyle::DashDot => Some("dashDot"),
            BorderLineStyle::MediumDashDot => Some("mediumDashDot"),
            BorderLineStyle::DashDotDot => Some("dashDotDot"),
            BorderLineStyle::MediumDashDotDot => Some("mediumDashDotDot"),
            BorderLineStyle::SlantDashDot => Some("slantDashDot"),
        }
    }

    /// Parse an OOXML line style name (`"none"` included)
    pub fn from_ooxml(name: &str) -> Option<Self> {
        let style = match name {
            "none" => BorderLineStyle::None,
            "thin" => BorderLineStyle::Thin,
            "medium" => BorderLineStyle::Medium,
            "thick" => BorderLineStyle::Thick,
            "dashed" => BorderLineStyle::Dashed,
            "dotted" => BorderLineStyle::Dotted,
            "double" => BorderLineStyle::Double,
            "hair" => BorderLineStyle::Hair,
            "mediumDashed" => BorderLineStyle::MediumDashed,
            "dashDot" => BorderLineStyle::DashDot,
            "mediumDashDot" => BorderLineStyle::MediumDashDot,
            "dashDotDot" => BorderLineStyle::DashDotDot,
            "mediumDashDotDot" => BorderLineStyle::MediumDashDotDot,
            "slantDashDot" => BorderLineStyle::SlantDashDot,
            _ => return None,
        };
        Some(style)
    }
}
