// File: crates/patchart-core/src/types.rs
// Summary: Shared types and constants (figure sizes per chart page).

use serde::Serialize;

/// Default figure width in pixels.
pub const WIDTH: f64 = 800.0;
/// Landscape pages use a golden-ratio height.
pub const GOLDEN: f64 = 0.618;

/// Figure size, in pixels.
/// Contract: both dimensions are positive.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Width with a golden-ratio height.
    pub fn landscape(width: f64) -> Self {
        Self::new(width, width * GOLDEN)
    }

    /// Raise each dimension to at least `min`.
    pub fn at_least(self, min: Size) -> Self {
        Self::new(self.width.max(min.width), self.height.max(min.height))
    }

    /// Pixel size after applying an export oversampling factor.
    pub fn scaled(self, factor: f64) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::landscape(WIDTH)
    }
}

/// Chart pages; each carries its own size defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Trend,
    Category,
    Rank,
    Utility,
}

impl Page {
    pub fn default_size(self) -> Size {
        match self {
            Page::Category => Size::new(600.0, 600.0),
            Page::Trend | Page::Rank | Page::Utility => Size::landscape(WIDTH),
        }
    }

    pub fn min_size(self) -> Size {
        match self {
            Page::Category => Size::new(600.0, 600.0),
            Page::Trend | Page::Rank | Page::Utility => Size::new(600.0, 400.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_clamps_to_page_minimum() {
        let s = Size::new(300.0, 900.0).at_least(Page::Category.min_size());
        assert_eq!(s, Size::new(600.0, 900.0));
    }

    #[test]
    fn raster_size_is_scaled() {
        assert_eq!(Size::new(600.0, 400.0).scaled(3.0), Size::new(1800.0, 1200.0));
    }

    #[test]
    fn landscape_pages_use_golden_height() {
        let s = Page::Rank.default_size();
        assert!((s.height - 494.4).abs() < 1e-9);
    }
}
