// File: crates/patchart-core/src/theme.rs
// Summary: Shared typography and color conventions handed to the renderer with every chart.

use serde::Serialize;

/// Bar color used when a chart has a single accent.
pub const BLUE: &str = "#636EFA";
/// Untinted Sankey links.
pub const LINK_GRAY: &str = "#AFAFAF";
pub const WATERFALL_BAR: &str = "#4499FF";
pub const WATERFALL_TEXT: &str = "#FFFFFF";
/// Bubble outline.
pub const BUBBLE_OUTLINE: &str = "#1A29FA";

const PLOTLY: &[&str] = &[
    "#636EFA", "#EF553B", "#00CC96", "#AB63FA", "#FFA15A",
    "#19D3F3", "#FF6692", "#B6E880", "#FF97FF", "#FECB52",
];

const D3: &[&str] = &[
    "#1F77B4", "#FF7F0E", "#2CA02C", "#D62728", "#9467BD",
    "#8C564B", "#E377C2", "#7F7F7F", "#BCBD22", "#17BECF",
];

/// Qualitative palette. The last entry doubles as the fallback color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub name: &'static str,
    colors: &'static [&'static str],
}

impl Palette {
    pub fn plotly() -> Self { Self { name: "plotly", colors: PLOTLY } }
    pub fn d3() -> Self { Self { name: "d3", colors: D3 } }

    pub fn colors(&self) -> &'static [&'static str] { self.colors }

    pub fn fallback(&self) -> &'static str {
        self.colors.last().copied().unwrap_or(LINK_GRAY)
    }

    /// Color for the `i`-th category, cycling.
    pub fn pick(&self, i: usize) -> &'static str {
        self.colors[i % self.colors.len()]
    }

    /// Find a palette by `name`, falling back to plotly.
    pub fn find(name: &str) -> Self {
        [Self::plotly(), Self::d3()]
            .into_iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .unwrap_or_default()
    }
}

impl Default for Palette {
    fn default() -> Self { Self::plotly() }
}

/// Font family and base size; every other text size derives from the base.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Typography {
    pub family: String,
    pub size: u32,
}

impl Typography {
    pub fn title_size(&self) -> u32 { self.size }
    pub fn tick_size(&self) -> u32 { self.size.saturating_sub(2) }
    pub fn text_size(&self) -> u32 { self.size.saturating_sub(2) }
    pub fn legend_size(&self) -> u32 { self.size.saturating_sub(4) }
}

impl Default for Typography {
    fn default() -> Self {
        Self { family: "SimHei".into(), size: 18 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Theme {
    pub typography: Typography,
    pub palette: Palette,
    pub background: &'static str,
    pub show_grid: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self { typography: Typography::default(), palette: Palette::default(), background: "white", show_grid: false }
    }
}

/// `#RRGGBB` -> `rgba(r,g,b,alpha)`. Anything else is returned unchanged.
pub fn hex_to_rgba(color: &str, alpha: f64) -> String {
    let hex = match color.strip_prefix('#') {
        Some(h) if h.len() == 6 && h.is_ascii() => h,
        _ => return color.to_string(),
    };
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
    match (channel(0), channel(2), channel(4)) {
        (Ok(r), Ok(g), Ok(b)) => format!("rgba({r},{g},{b},{alpha})"),
        _ => color.to_string(),
    }
}
