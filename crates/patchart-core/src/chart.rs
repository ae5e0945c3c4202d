// File: crates/patchart-core/src/chart.rs
// Summary: Chart kinds, their column roles and presentation options, and the build pipeline.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::info;

use crate::bubble::{self, BubbleOptions, PieBubbleOptions};
use crate::composition::{self, CompositionKind, PieOptions, TextInfo, WaterfallStyle};
use crate::dataset::Dataset;
use crate::dualbar::{self, DualBarOptions};
use crate::error::{ChartError, Result};
use crate::export::ExportFormat;
use crate::flow::{self, FlowOptions};
use crate::geometry::ChartGeometry;
use crate::rank::{self, RankOptions};
use crate::roles::{self, RoleSelection, RoleSpec};
use crate::theme::{self, Theme};
use crate::trend;
use crate::types::{Page, Size};

const TREND_ROLES: &[RoleSpec] = &[RoleSpec::one(roles::X), RoleSpec::one(roles::Y), RoleSpec::one(roles::GROUP).optional()];
const PIE_ROLES: &[RoleSpec] = &[RoleSpec::one(roles::NAMES), RoleSpec::one(roles::VALUE)];
const HIERARCHY_ROLES: &[RoleSpec] = &[RoleSpec::many(roles::PATH), RoleSpec::one(roles::VALUE), RoleSpec::one(roles::COLOR)];
const WATERFALL_ROLES: &[RoleSpec] = &[RoleSpec::one(roles::X), RoleSpec::one(roles::Y)];
const DUAL_BAR_ROLES: &[RoleSpec] = &[RoleSpec::one(roles::X), RoleSpec::one(roles::Y), RoleSpec::one(roles::CATEGORY)];
const RANK_ROLES: &[RoleSpec] = &[RoleSpec::one(roles::CATEGORY), RoleSpec::one(roles::VALUE), RoleSpec::one(roles::SERIES).optional()];
const BUBBLE_ROLES: &[RoleSpec] = &[RoleSpec::one(roles::X), RoleSpec::many(roles::Y)];
const PIE_BUBBLE_ROLES: &[RoleSpec] = &[RoleSpec::one(roles::X), RoleSpec::one(roles::SEGMENT), RoleSpec::many(roles::Y)];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Trend,
    Pie,
    Treemap,
    Sunburst,
    Waterfall,
    DualBar,
    Rank,
    Bubble,
    PieBubble,
    Sankey,
}

impl ChartKind {
    pub const ALL: [ChartKind; 10] = [
        ChartKind::Trend,
        ChartKind::Pie,
        ChartKind::Treemap,
        ChartKind::Sunburst,
        ChartKind::Waterfall,
        ChartKind::DualBar,
        ChartKind::Rank,
        ChartKind::Bubble,
        ChartKind::PieBubble,
        ChartKind::Sankey,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ChartKind::Trend => "trend",
            ChartKind::Pie => "pie",
            ChartKind::Treemap => "treemap",
            ChartKind::Sunburst => "sunburst",
            ChartKind::Waterfall => "waterfall",
            ChartKind::DualBar => "dual_bar",
            ChartKind::Rank => "rank",
            ChartKind::Bubble => "bubble",
            ChartKind::PieBubble => "pie_bubble",
            ChartKind::Sankey => "sankey",
        }
    }

    /// Column slots the kind reads. Sankey reads the whole wide matrix.
    pub fn roles(self) -> &'static [RoleSpec] {
        match self {
            ChartKind::Trend => TREND_ROLES,
            ChartKind::Pie => PIE_ROLES,
            ChartKind::Treemap | ChartKind::Sunburst => HIERARCHY_ROLES,
            ChartKind::Waterfall => WATERFALL_ROLES,
            ChartKind::DualBar => DUAL_BAR_ROLES,
            ChartKind::Rank => RANK_ROLES,
            ChartKind::Bubble => BUBBLE_ROLES,
            ChartKind::PieBubble => PIE_BUBBLE_ROLES,
            ChartKind::Sankey => &[],
        }
    }

    pub fn page(self) -> Page {
        match self {
            ChartKind::Trend => Page::Trend,
            ChartKind::Pie
            | ChartKind::Treemap
            | ChartKind::Sunburst
            | ChartKind::Waterfall
            | ChartKind::DualBar => Page::Category,
            ChartKind::Rank => Page::Rank,
            ChartKind::Bubble | ChartKind::PieBubble | ChartKind::Sankey => Page::Utility,
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChartKind {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self> {
        let norm = s.trim().to_ascii_lowercase().replace('-', "_");
        ChartKind::ALL
            .into_iter()
            .find(|k| k.name() == norm)
            .ok_or_else(|| ChartError::UnknownChartKind(s.to_string()))
    }
}

/// Presentation parameters. Each chart kind reads the fields it needs.
#[derive(Clone, Debug)]
pub struct ChartOptions {
    /// `None` uses the page default.
    pub size: Option<Size>,
    pub export: ExportFormat,
    pub theme: Theme,
    pub line_color: String,
    pub pie: PieOptions,
    pub text_info: Vec<TextInfo>,
    pub waterfall: WaterfallStyle,
    pub dual_bar: DualBarOptions,
    pub rank: RankOptions,
    pub bubble: BubbleOptions,
    pub pie_bubble: PieBubbleOptions,
    pub flow: FlowOptions,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            size: None,
            export: ExportFormat::default(),
            theme: Theme::default(),
            line_color: theme::BLUE.to_string(),
            pie: PieOptions::default(),
            text_info: vec![TextInfo::Label],
            waterfall: WaterfallStyle::default(),
            dual_bar: DualBarOptions::default(),
            rank: RankOptions::default(),
            bubble: BubbleOptions::default(),
            pie_bubble: PieBubbleOptions::default(),
            flow: FlowOptions::default(),
        }
    }
}

/// Everything the renderer needs for one chart.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Figure {
    pub kind: ChartKind,
    pub size: Size,
    pub export: ExportFormat,
    pub export_scale: f64,
    pub file_name: String,
    pub theme: Theme,
    pub geometry: ChartGeometry,
}

/// A chart request: kind, column roles and options. Rebuilt on every interaction.
#[derive(Clone, Debug)]
pub struct Chart {
    pub kind: ChartKind,
    pub roles: RoleSelection,
    pub options: ChartOptions,
}

impl Chart {
    pub fn new(kind: ChartKind) -> Self {
        Self { kind, roles: RoleSelection::new(), options: ChartOptions::default() }
    }

    pub fn with_role(mut self, role: &str, column: impl Into<String>) -> Self {
        self.roles.push(role, column);
        self
    }

    pub fn with_options(mut self, options: ChartOptions) -> Self {
        self.options = options;
        self
    }

    /// Validate roles against `dataset` (all issues at once), then build the geometry.
    #[tracing::instrument(skip_all, fields(kind = %self.kind))]
    pub fn build(&self, dataset: &Dataset) -> Result<Figure> {
        let r = self.roles.resolve(self.kind.roles(), dataset)?;
        let o = &self.options;
        let palette = o.theme.palette;

        let geometry = match self.kind {
            ChartKind::Trend => ChartGeometry::Trend(trend::trend_lines(
                dataset,
                r.one(roles::X)?,
                r.one(roles::Y)?,
                r.optional(roles::GROUP),
                &o.line_color,
            )?),
            ChartKind::Pie => ChartGeometry::Composition(composition::pie(
                dataset,
                r.one(roles::NAMES)?,
                r.one(roles::VALUE)?,
                o.pie,
            )?),
            ChartKind::Treemap | ChartKind::Sunburst => {
                let kind = if self.kind == ChartKind::Treemap { CompositionKind::Treemap } else { CompositionKind::Sunburst };
                ChartGeometry::Composition(composition::hierarchy(
                    dataset,
                    kind,
                    r.many(roles::PATH),
                    r.one(roles::VALUE)?,
                    r.one(roles::COLOR)?,
                    &o.text_info,
                )?)
            }
            ChartKind::Waterfall => ChartGeometry::Waterfall(composition::waterfall(
                dataset,
                r.one(roles::X)?,
                r.one(roles::Y)?,
                &o.waterfall,
            )?),
            ChartKind::DualBar => ChartGeometry::DualBar(dualbar::dual_bar(
                dataset,
                r.one(roles::X)?,
                r.one(roles::Y)?,
                r.one(roles::CATEGORY)?,
                &o.dual_bar,
            )?),
            ChartKind::Rank => ChartGeometry::Rank(rank::rank_table(
                dataset,
                r.one(roles::CATEGORY)?,
                r.one(roles::VALUE)?,
                r.optional(roles::SERIES),
                o.rank,
            )?),
            ChartKind::Bubble => ChartGeometry::Bubble(bubble::bubbles(dataset, r.one(roles::X)?, r.many(roles::Y), o.bubble)?),
            ChartKind::PieBubble => ChartGeometry::PieBubble(bubble::pie_bubbles(
                dataset,
                r.one(roles::X)?,
                r.one(roles::SEGMENT)?,
                r.many(roles::Y),
                PieBubbleOptions { palette, ..o.pie_bubble },
            )?),
            ChartKind::Sankey => {
                ChartGeometry::Flow(flow::flow_edges(dataset, &FlowOptions { palette, ..o.flow.clone() })?)
            }
        };

        let page = self.kind.page();
        let size = o.size.map(|s| s.at_least(page.min_size())).unwrap_or_else(|| page.default_size());
        info!(marks = geometry.mark_count(), width = size.width, height = size.height, "chart built");

        Ok(Figure {
            kind: self.kind,
            size,
            export: o.export,
            export_scale: o.export.scale(),
            file_name: o.export.file_name(self.kind),
            theme: o.theme.clone(),
            geometry,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_name() {
        for k in ChartKind::ALL {
            assert_eq!(k.name().parse::<ChartKind>().unwrap(), k);
        }
        assert_eq!("Pie-Bubble".parse::<ChartKind>().unwrap(), ChartKind::PieBubble);
        assert!(matches!("radar".parse::<ChartKind>(), Err(ChartError::UnknownChartKind(_))));
    }

    #[test]
    fn sankey_takes_no_roles() {
        assert!(ChartKind::Sankey.roles().is_empty());
        assert_eq!(ChartKind::Waterfall.page(), Page::Category);
    }
}
