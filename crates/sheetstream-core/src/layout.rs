//! Page layout settings passed through to encoders

/// Page margins in inches
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageMargins {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
    pub header: f64,
    pub footer: f64,
    /// Center the printout horizontally on the page
    pub center_horizontally: bool,
    /// Center the printout vertically on the page
    pub center_vertically: bool,
}

impl Default for PageMargins {
    fn default() -> Self {
        Self {
            top: 0.75,
            bottom: 0.75,
            left: 0.7,
            right: 0.7,
            header: 0.3,
            footer: 0.3,
            center_horizontally: false,
            center_vertically: false,
        }
    }
}

impl PageMargins {
    /// Same margin on all four sides, default header/footer
    pub fn uniform(margin: f64) -> Self {
        Self {
            top: margin,
            bottom: margin,
            left: margin,
            right: margin,
            ..Self::default()
        }
    }
}

/// Page setup for printing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    /// Paper size (e.g., 1 = Letter, 9 = A4)
    pub paper_size: u8,
    pub orientation: Orientation,
    /// Scale percentage (10-400), ignored when fitting to pages
    pub scale: u16,
    /// Fit to pages wide
    pub fit_to_width: Option<u16>,
    /// Fit to pages tall
    pub fit_to_height: Option<u16>,
    pub first_page_number: Option<u32>,
    pub black_and_white: bool,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            paper_size: 1,
            orientation: Orientation::Portrait,
            scale: 100,
            fit_to_width: None,
            fit_to_height: None,
            first_page_number: None,
            black_and_white: false,
        }
    }
}

impl PageLayout {
    pub const PAPER_LETTER: u8 = 1;
    pub const PAPER_A4: u8 = 9;

    pub fn with_paper_size(mut self, paper_size: u8) -> Self {
        self.paper_size = paper_size;
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set the scale, clamped to 10-400
    pub fn with_scale(mut self, scale: u16) -> Self {
        self.scale = scale.clamp(10, 400);
        self
    }

    /// Fit the printout to the given number of pages
    pub fn fit_to(mut self, width: u16, height: u16) -> Self {
        self.fit_to_width = Some(width);
        self.fit_to_height = Some(height);
        self
    }

    /// True when fit-to-page is enabled
    pub fn fits_to_page(&self) -> bool {
        self.fit_to_width.is_some() || self.fit_to_height.is_some()
    }
}

/// Page orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn as_ooxml(&self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        }
    }
}
