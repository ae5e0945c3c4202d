// File: crates/patchart-core/src/flow.rs
// Summary: Sankey flow geometry from a wide origin x destination matrix.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::dataset::Dataset;
use crate::error::{ChartError, Result};
use crate::theme::{self, Palette};

/// Source nodes that get their own color. A qualitative palette stays
/// distinguishable in a legend up to about this many entries.
pub const NODE_COLOR_LIMIT: usize = 9;

/// Source nodes whose links are tinted. More tinted links than this turn the
/// diagram into noise, so the rest stay gray.
pub const LINK_COLOR_LIMIT: usize = 5;

/// Link tint opacity.
pub const LINK_ALPHA: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeSide {
    Source,
    Target,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FlowNode {
    pub label: String,
    pub side: NodeSide,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FlowEdge {
    /// Index into [`FlowGeometry::nodes`].
    pub source: usize,
    /// Index into [`FlowGeometry::nodes`].
    pub target: usize,
    pub value: f64,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FlowGeometry {
    /// Sources in row order, then targets in column order.
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
    pub source_title: String,
}

impl FlowGeometry {
    pub fn source_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.side == NodeSide::Source).count()
    }
}

#[derive(Clone, Debug, Default)]
pub struct FlowOptions {
    /// Tint links by their source node's color.
    pub color_links: bool,
    pub palette: Palette,
}

/// First column holds source labels; every other header is a target label.
///
/// Edges are emitted target-column major, zero cells are pruned, negative
/// cells are kept and null cells carry no edge. Source and target nodes are
/// separate even when their labels match; colors are looked up by label so a
/// country keeps one color on both sides.
pub fn flow_edges(dataset: &Dataset, opts: &FlowOptions) -> Result<FlowGeometry> {
    let (source_col, target_cols) = dataset.columns().split_first().ok_or(ChartError::EmptyDataset)?;
    let rows = dataset.row_count();
    let matrix = target_cols.iter().map(|c| c.numeric()).collect::<Result<Vec<_>>>()?;

    let sources = source_col.labels();
    let totals: Vec<f64> = (0..rows)
        .map(|r| matrix.iter().filter_map(|col| col[r]).sum())
        .collect();
    let mut ranked: Vec<usize> = (0..rows).collect();
    ranked.sort_by(|&a, &b| totals[b].total_cmp(&totals[a]));

    let node_colors: HashMap<&str, &str> = ranked
        .iter()
        .take(NODE_COLOR_LIMIT)
        .zip(opts.palette.colors())
        .map(|(&r, &c)| (sources[r].as_str(), c))
        .collect();
    let link_colors: HashMap<&str, String> = ranked
        .iter()
        .take(LINK_COLOR_LIMIT)
        .zip(opts.palette.colors())
        .map(|(&r, &c)| (sources[r].as_str(), theme::hex_to_rgba(c, LINK_ALPHA)))
        .collect();

    let fallback = opts.palette.fallback();
    let node = |label: String, side| FlowNode {
        color: node_colors.get(label.as_str()).copied().unwrap_or(fallback).to_string(),
        label,
        side,
    };
    let mut nodes: Vec<FlowNode> = sources.iter().map(|s| node(s.clone(), NodeSide::Source)).collect();
    nodes.extend(target_cols.iter().map(|c| node(c.name().to_string(), NodeSide::Target)));

    let link_fallback = theme::hex_to_rgba(theme::LINK_GRAY, LINK_ALPHA);
    let mut edges = Vec::new();
    let mut pruned = 0usize;
    for (t, col) in matrix.iter().enumerate() {
        for (s, cell) in col.iter().enumerate() {
            match *cell {
                Some(v) if v != 0.0 => {
                    let color = if opts.color_links {
                        link_colors
                            .get(sources[s].as_str())
                            .cloned()
                            .unwrap_or_else(|| link_fallback.clone())
                    } else {
                        theme::LINK_GRAY.to_string()
                    };
                    edges.push(FlowEdge { source: s, target: rows + t, value: v, color });
                }
                _ => pruned += 1,
            }
        }
    }
    debug!(nodes = nodes.len(), edges = edges.len(), pruned, "built flow geometry");

    Ok(FlowGeometry { nodes, edges, source_title: source_col.name().to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Column;

    #[test]
    fn node_colors_follow_outgoing_totals() {
        let ds = Dataset::new(vec![
            Column::from_texts("origin", ["small", "big"]),
            Column::from_numbers("X", [1.0, 10.0]),
        ])
        .unwrap();
        let g = flow_edges(&ds, &FlowOptions::default()).unwrap();
        let palette = Palette::default();
        assert_eq!(g.nodes[1].color, palette.colors()[0]);
        assert_eq!(g.nodes[0].color, palette.colors()[1]);
        assert_eq!(g.nodes[2].color, palette.fallback());
    }
}
