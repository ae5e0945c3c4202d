// File: crates/patchart-core/src/rank.rs
// Summary: Ranking-bar matrix: stable ascending sort, optional pivot into several series.

use std::cmp::Ordering;

use serde::Serialize;
use tracing::debug;

use crate::dataset::Dataset;
use crate::error::{ChartError, Result, RoleIssue};
use crate::reshape::pivot_wider;
use crate::roles;

/// How several series share one category slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BarMode {
    /// Stacked.
    Relative,
    /// Clustered side by side.
    #[default]
    Group,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextPosition {
    Inside,
    Outside,
}

impl BarMode {
    pub fn text_position(self) -> TextPosition {
        match self {
            BarMode::Relative => TextPosition::Inside,
            BarMode::Group => TextPosition::Outside,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relative" | "stack" | "stacked" => Some(BarMode::Relative),
            "group" | "grouped" | "cluster" => Some(BarMode::Group),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RankSeries {
    pub name: String,
    /// Aligned with [`RankedMatrix::categories`]; `None` where a category has no value.
    pub values: Vec<Option<f64>>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RankedMatrix {
    pub category_title: String,
    pub value_title: String,
    /// Empty for a single-series ranking.
    pub legend_title: String,
    pub categories: Vec<String>,
    pub series: Vec<RankSeries>,
    pub bar_mode: BarMode,
    pub text_position: TextPosition,
    pub vertical: bool,
    pub reverse_axis: bool,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RankOptions {
    pub bar_mode: BarMode,
    /// Columns instead of horizontal bars.
    pub vertical: bool,
    /// Flip the category axis so the largest value comes first.
    pub reverse_axis: bool,
}

/// Build the ranking matrix.
///
/// A two-column dataset is ranked directly on `value`. A wider dataset needs a
/// `series` column: rows are pivoted to one series per distinct series value and
/// ranked on the first series. Sorting is ascending and stable, nulls last.
pub fn rank_table(
    dataset: &Dataset,
    category: &str,
    value: &str,
    series: Option<&str>,
    opts: RankOptions,
) -> Result<RankedMatrix> {
    let (categories, series_cols, legend_title) = if dataset.column_count() > 2 {
        let series = series.ok_or_else(|| {
            ChartError::InvalidRoles(vec![RoleIssue::Missing { role: roles::SERIES.into() }])
        })?;
        let wide = pivot_wider(dataset, category, series, value)?;
        let (index, rest) = wide.columns().split_first().ok_or(ChartError::EmptyDataset)?;
        let cols = rest
            .iter()
            .map(|c| Ok(RankSeries { name: c.name().to_string(), values: c.numeric()? }))
            .collect::<Result<Vec<_>>>()?;
        (index.labels(), cols, series.to_string())
    } else {
        let cat_col = dataset.require(roles::CATEGORY, category)?;
        let value_col = dataset.require(roles::VALUE, value)?;
        let col = RankSeries { name: value.to_string(), values: value_col.numeric()? };
        (cat_col.labels(), vec![col], String::new())
    };

    let order = match series_cols.first() {
        Some(key) => stable_order(&key.values),
        None => (0..categories.len()).collect(),
    };
    debug!(categories = categories.len(), series = series_cols.len(), "built ranked matrix");

    Ok(RankedMatrix {
        category_title: category.to_string(),
        value_title: value.to_string(),
        legend_title,
        categories: order.iter().map(|&i| categories[i].clone()).collect(),
        series: series_cols
            .into_iter()
            .map(|s| RankSeries { values: order.iter().map(|&i| s.values[i]).collect(), name: s.name })
            .collect(),
        bar_mode: opts.bar_mode,
        text_position: opts.bar_mode.text_position(),
        vertical: opts.vertical,
        reverse_axis: opts.reverse_axis,
    })
}

/// Indices sorted ascending by `key`; ties keep input order, nulls sort last.
fn stable_order(key: &[Option<f64>]) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..key.len()).collect();
    idx.sort_by(|&a, &b| nulls_last(key[a], key[b]));
    idx
}

fn nulls_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nulls_sort_after_numbers() {
        assert_eq!(stable_order(&[None, Some(2.0), Some(1.0)]), vec![2, 1, 0]);
    }

    #[test]
    fn bar_mode_drives_text_position() {
        assert_eq!(BarMode::Relative.text_position(), TextPosition::Inside);
        assert_eq!(BarMode::default().text_position(), TextPosition::Outside);
        assert_eq!(BarMode::parse("stacked"), Some(BarMode::Relative));
    }
}
