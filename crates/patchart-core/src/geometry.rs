// File: crates/patchart-core/src/geometry.rs
// Summary: The geometry variants a chart build can hand to the renderer.

use serde::Serialize;

use crate::bubble::{BubbleGeometry, PieBubbleGeometry};
use crate::composition::{CompositionGeometry, WaterfallGeometry};
use crate::dualbar::DualBarGeometry;
use crate::flow::FlowGeometry;
use crate::rank::RankedMatrix;
use crate::trend::TrendGeometry;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ChartGeometry {
    Trend(TrendGeometry),
    Composition(CompositionGeometry),
    Waterfall(WaterfallGeometry),
    DualBar(DualBarGeometry),
    Rank(RankedMatrix),
    Bubble(BubbleGeometry),
    PieBubble(PieBubbleGeometry),
    Flow(FlowGeometry),
}

impl ChartGeometry {
    /// Number of drawable marks (points, slices, bars, cells or edges).
    pub fn mark_count(&self) -> usize {
        match self {
            ChartGeometry::Trend(g) => g.series.iter().map(|s| s.points.len()).sum(),
            ChartGeometry::Composition(g) => g.values.len(),
            ChartGeometry::Waterfall(g) => g.steps.len(),
            ChartGeometry::DualBar(g) => g.left.bars.len() + g.right.bars.len(),
            ChartGeometry::Rank(g) => g.categories.len() * g.series.len(),
            ChartGeometry::Bubble(g) => g.points.len(),
            ChartGeometry::PieBubble(g) => g.cells.len(),
            ChartGeometry::Flow(g) => g.edges.len(),
        }
    }
}
