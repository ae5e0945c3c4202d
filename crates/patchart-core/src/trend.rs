// File: crates/patchart-core/src/trend.rs
// Summary: Trend-line series, one per group, points in row order.

use serde::Serialize;
use tracing::debug;

use crate::dataset::{Dataset, Value};
use crate::error::{ChartError, Result};
use crate::roles;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrendSeries {
    /// Group label; empty for an ungrouped trend.
    pub name: String,
    pub points: Vec<(Value, f64)>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrendGeometry {
    pub x_title: String,
    pub y_title: String,
    pub series: Vec<TrendSeries>,
    pub color: String,
}

/// Lines of `y` over `x`. With a `group` column, each distinct group value
/// (first-seen order) becomes its own series.
///
/// Rows with a null `y` are skipped so the line breaks cleanly.
pub fn trend_lines(dataset: &Dataset, x: &str, y: &str, group: Option<&str>, color: &str) -> Result<TrendGeometry> {
    let x_col = dataset.require(roles::X, x)?;
    let y_col = dataset.require(roles::Y, y)?;
    let group_col = group.map(|g| dataset.require(roles::GROUP, g)).transpose()?;
    let ys = y_col.numeric()?;

    let mut series: Vec<TrendSeries> = match group_col {
        Some(g) => g.distinct().into_iter().map(|v| TrendSeries { name: v.label(), points: Vec::new() }).collect(),
        None => vec![TrendSeries { name: String::new(), points: Vec::new() }],
    };
    for (row, cell) in ys.into_iter().enumerate() {
        let Some(value) = cell else { continue };
        let slot = match group_col {
            Some(g) => {
                let label = g.values()[row].label();
                series.iter().position(|s| s.name == label).ok_or_else(|| {
                    ChartError::UnknownCategory { column: g.name().to_string(), value: label }
                })?
            }
            None => 0,
        };
        series[slot].points.push((x_col.values()[row].clone(), value));
    }
    debug!(series = series.len(), "built trend geometry");

    Ok(TrendGeometry { x_title: x.to_string(), y_title: y.to_string(), series, color: color.to_string() })
}
