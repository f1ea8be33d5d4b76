//! Cell styling types
//!
//! This module contains the style descriptor and the machinery around it:
//! - [`Style`] - Complete, immutable style descriptor
//! - [`StyleRegistry`] - Content-addressed deduplication to encoder handles
//! - [`merge_styles`] - Override merging of two descriptors
//! - [`FontStyle`], [`FillStyle`], [`BorderStyle`], [`Alignment`], [`Color`]

mod alignment;
mod border;
mod color;
mod fill;
mod font;
mod merge;
mod number_format;
mod registry;

pub use alignment::{Alignment, HorizontalAlignment, VerticalAlignment};
pub use border::{BorderEdge, BorderLineStyle, BorderSide, BorderStyle};
pub use color::Color;
pub use fill::{FillStyle, PatternType};
pub use font::{FontStyle, Underline};
pub use merge::merge_styles;
pub use number_format::NumberFormat;
pub use registry::{StoredStyle, StyleAllocator, StyleHandle, StyleRegistry};

/// Complete cell style
///
/// Two styles with the same content are the same style: equality and
/// hashing are structural, and [`StyleRegistry`] hands out one handle per
/// distinct (canonical) style.
///
/// Optional parts (`font`, `alignment`, `protection`, ...) left unset mean
/// "not specified"; this matters when a style is overridden, see
/// [`merge_styles`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Style {
    pub border: BorderStyle,
    pub fill: FillStyle,
    pub font: Option<FontStyle>,
    pub alignment: Option<Alignment>,
    pub number_format: NumberFormat,
    /// Decimal places applied on top of the number format
    pub decimal_places: Option<u8>,
    /// Show negative numbers in red
    pub negative_red: bool,
    pub protection: Option<Protection>,
    /// Language tag used for localized number formats (e.g. "ja-jp")
    pub language: Option<String>,
}

impl Style {
    /// Create an empty style
    pub fn new() -> Self {
        Self::default()
    }

    /// Style that only carries borders
    pub fn with_border(border: BorderStyle) -> Self {
        Self {
            border,
            ..Self::default()
        }
    }

    /// Set the border
    pub fn border(mut self, border: BorderStyle) -> Self {
        self.border = border;
        self
    }

    /// Set the fill
    pub fn fill(mut self, fill: FillStyle) -> Self {
        self.fill = fill;
        self
    }

    /// Set fill color (solid fill)
    pub fn fill_color(mut self, color: Color) -> Self {
        self.fill = FillStyle::Solid { color };
        self
    }

    /// Set the font
    pub fn font(mut self, font: FontStyle) -> Self {
        self.font = Some(font);
        self
    }

    /// Set a bold default font
    pub fn bold(self) -> Self {
        self.font(FontStyle::new().with_bold(true))
    }

    /// Set the alignment
    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    /// Set the number format
    pub fn number_format(mut self, format: NumberFormat) -> Self {
        self.number_format = format;
        self
    }

    /// Set the decimal places
    pub fn decimal_places(mut self, places: u8) -> Self {
        self.decimal_places = Some(places);
        self
    }

    /// Show negative numbers in red
    pub fn negative_red(mut self, negative_red: bool) -> Self {
        self.negative_red = negative_red;
        self
    }

    /// Set cell protection
    pub fn protection(mut self, protection: Protection) -> Self {
        self.protection = Some(protection);
        self
    }

    /// Set the language tag
    pub fn language<S: Into<String>>(mut self, language: S) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Check if the style specifies nothing at all
    pub fn is_empty(&self) -> bool {
        self.canonical() == Style::default()
    }

    /// Normal form used for identity
    ///
    /// Border edges without a line and pattern fills without a pattern are
    /// dropped, so they do not produce distinct handles.
    pub fn canonical(&self) -> Style {
        Style {
            border: self.border.canonical(),
            fill: self.fill.canonical(),
            ..self.clone()
        }
    }
}

/// Cell protection settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Protection {
    /// Cell is locked (protected when sheet is protected)
    pub locked: bool,
    /// Formula is hidden when sheet is protected
    pub hidden: bool,
}

impl Default for Protection {
    fn default() -> Self {
        Self {
            locked: true,
            hidden: false,
        }
    }
}

impl Protection {
    /// Create unlocked protection
    pub fn unlocked() -> Self {
        Self {
            locked: false,
            hidden: false,
        }
    }
}
