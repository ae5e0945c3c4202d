// File: crates/patchart-core/src/bubble.rs
// Summary: Bubble matrix (melted wide table) and pie-bubble grid geometry.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::dataset::{format_number, Dataset, Value};
use crate::error::Result;
use crate::reshape::{self, melt};
use crate::roles;
use crate::theme::{self, Palette};

pub const DEFAULT_SIZE_MAX: f64 = 55.0;
pub const MIN_SIZE_MAX: f64 = 10.0;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BubblePoint {
    pub x: Value,
    /// Name of the wide column this point came from.
    pub y: String,
    pub size: Option<f64>,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BubbleGeometry {
    pub points: Vec<BubblePoint>,
    /// Largest marker diameter in pixels; marker area scales with `size`.
    pub size_max: f64,
    pub show_labels: bool,
    pub outline: &'static str,
}

#[derive(Clone, Copy, Debug)]
pub struct BubbleOptions {
    pub size_max: f64,
    pub show_labels: bool,
}

impl Default for BubbleOptions {
    fn default() -> Self {
        Self { size_max: DEFAULT_SIZE_MAX, show_labels: false }
    }
}

/// One bubble per `(x row, y column)` cell of a wide table.
pub fn bubbles(dataset: &Dataset, x: &str, ys: &[String], opts: BubbleOptions) -> Result<BubbleGeometry> {
    let long = melt(dataset, x, ys)?;
    let ids = long.require(roles::X, x)?;
    let vars = long.require(roles::Y, reshape::VARIABLE)?;
    let sizes = long.require(roles::VALUE, reshape::VALUE)?;

    let points: Vec<BubblePoint> = sizes
        .numeric()?
        .into_iter()
        .enumerate()
        .map(|(r, size)| BubblePoint {
            x: ids.values()[r].clone(),
            y: vars.values()[r].label(),
            size,
            text: sizes.values()[r].label(),
        })
        .collect();
    debug!(points = points.len(), "built bubble geometry");

    Ok(BubbleGeometry { points, size_max: opts.size_max.max(MIN_SIZE_MAX), show_labels: opts.show_labels, outline: theme::BUBBLE_OUTLINE })
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PieCell {
    pub row: usize,
    pub column: usize,
    pub center: (f64, f64),
    pub radius: f64,
    /// Aligned with [`PieBubbleGeometry::segments`].
    pub wedges: Vec<f64>,
    pub total: f64,
    pub label: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PieBubbleGeometry {
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    pub segments: Vec<String>,
    pub segment_colors: Vec<&'static str>,
    pub x_ticks: Vec<f64>,
    pub y_ticks: Vec<f64>,
    /// Only cells with a positive total; empty cells draw nothing.
    pub cells: Vec<PieCell>,
}

#[derive(Clone, Copy, Debug)]
pub struct PieBubbleOptions {
    pub rscale: f64,
    pub xscale: f64,
    pub yscale: f64,
    pub show_labels: bool,
    pub palette: Palette,
}

impl Default for PieBubbleOptions {
    fn default() -> Self {
        Self { rscale: 1.4, xscale: 3.5, yscale: 2.0, show_labels: false, palette: Palette::default() }
    }
}

/// Grid of small pies: one row per distinct `x` (sorted), one column per `ys`
/// entry, one wedge per distinct `segment` (sorted). Wedges sum duplicate rows
/// and nulls count as zero. Pie area is proportional to the cell total, scaled
/// so the largest cell has radius `rscale`.
pub fn pie_bubbles(
    dataset: &Dataset,
    x: &str,
    segment: &str,
    ys: &[String],
    opts: PieBubbleOptions,
) -> Result<PieBubbleGeometry> {
    let x_col = dataset.require(roles::X, x)?;
    let seg_col = dataset.require(roles::SEGMENT, segment)?;
    let y_cols = ys.iter().map(|y| dataset.require(roles::Y, y)).collect::<Result<Vec<_>>>()?;

    let rows = x_col.distinct_sorted();
    let segments = seg_col.distinct_sorted();
    let row_pos: HashMap<&Value, usize> = rows.iter().enumerate().map(|(i, v)| (*v, i)).collect();
    let seg_pos: HashMap<&Value, usize> = segments.iter().enumerate().map(|(i, v)| (*v, i)).collect();

    // sums[row][column][segment]
    let mut sums = vec![vec![vec![0.0f64; segments.len()]; y_cols.len()]; rows.len()];
    for (j, col) in y_cols.iter().enumerate() {
        for (r, v) in col.numeric()?.into_iter().enumerate() {
            let i = row_pos[&x_col.values()[r]];
            let k = seg_pos[&seg_col.values()[r]];
            sums[i][j][k] += v.unwrap_or(0.0);
        }
    }

    let max_total = sums
        .iter()
        .flat_map(|row| row.iter().map(|w| w.iter().sum::<f64>()))
        .fold(0.0f64, f64::max);

    let mut cells = Vec::new();
    for (i, row) in sums.into_iter().enumerate() {
        for (j, wedges) in row.into_iter().enumerate() {
            let total: f64 = wedges.iter().sum();
            if total <= 0.0 || max_total <= 0.0 {
                continue;
            }
            cells.push(PieCell {
                row: i,
                column: j,
                center: (i as f64 * opts.xscale, j as f64 * opts.yscale),
                radius: (total.sqrt() / max_total.sqrt()) * opts.rscale,
                wedges,
                total,
                label: opts.show_labels.then(|| format_number(total)),
            });
        }
    }
    debug!(rows = rows.len(), columns = ys.len(), cells = cells.len(), "built pie-bubble geometry");

    Ok(PieBubbleGeometry {
        x_ticks: (0..rows.len()).map(|i| i as f64 * opts.xscale).collect(),
        y_ticks: (0..ys.len()).map(|j| j as f64 * opts.yscale).collect(),
        rows: rows.iter().map(|v| v.label()).collect(),
        columns: ys.to_vec(),
        segment_colors: (0..segments.len()).map(|k| opts.palette.pick(k)).collect(),
        segments: segments.iter().map(|v| v.label()).collect(),
        cells,
    })
}
