// File: crates/patchart-core/src/export.rs
// Summary: Export format settings handed to the renderer (vector preferred, raster oversampled).

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::chart::ChartKind;
use crate::error::ChartError;

/// Raster exports are rendered at this multiple of the figure size.
pub const RASTER_SCALE: f64 = 3.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Editable afterwards, so it is the default.
    #[default]
    Svg,
    Png,
}

impl ExportFormat {
    pub fn scale(self) -> f64 {
        match self {
            ExportFormat::Svg => 1.0,
            ExportFormat::Png => RASTER_SCALE,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Svg => "svg",
            ExportFormat::Png => "png",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            ExportFormat::Svg => "image/svg+xml",
            ExportFormat::Png => "image/png",
        }
    }

    /// Download name, e.g. `sankey.svg`.
    pub fn file_name(self, kind: ChartKind) -> String {
        format!("{}.{}", kind.name(), self.extension())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "svg" => Ok(ExportFormat::Svg),
            "png" => Ok(ExportFormat::Png),
            other => Err(ChartError::UnsupportedFormat(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raster_is_oversampled() {
        assert_eq!(ExportFormat::Svg.scale(), 1.0);
        assert_eq!(ExportFormat::Png.scale(), 3.0);
    }

    #[test]
    fn parse_and_file_name() {
        let f: ExportFormat = ".PNG".parse().unwrap();
        assert_eq!(f, ExportFormat::Png);
        assert_eq!(f.file_name(ChartKind::DualBar), "dual_bar.png");
        assert!("gif".parse::<ExportFormat>().is_err());
        assert_eq!(f.mime(), "image/png");
        assert_eq!(ExportFormat::Svg.mime(), "image/svg+xml");
    }
}
