// File: crates/patchart-core/src/dualbar.rs
// Summary: Mirrored two-group bar geometry around a center gap.

use serde::Serialize;
use tracing::debug;

use crate::dataset::{Dataset, Value};
use crate::error::{ChartError, Result};
use crate::roles;

/// Default half-width of the center gap, in magnitude units.
pub const DEFAULT_GAP: f64 = 50.0;
pub const MIN_GAP: f64 = 10.0;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub magnitude: f64,
    /// Signed bar length: `+magnitude` on the left group, `-magnitude` on the right.
    pub length: f64,
    /// Where the bar starts: `+gap` or `-gap`.
    pub base: f64,
    pub text: String,
}

impl Bar {
    /// Far end of the bar along the magnitude axis.
    pub fn end(&self) -> f64 {
        self.base + self.length
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BarGroup {
    /// Category value this group was split on.
    pub key: Value,
    pub name: String,
    pub bars: Vec<Bar>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DualBarGeometry {
    pub left: BarGroup,
    pub right: BarGroup,
    pub gap: f64,
    /// Labels drawn on the center line, taken from the left group.
    pub center_labels: Vec<String>,
    pub magnitude_title: String,
    pub reverse_y: bool,
}

#[derive(Clone, Debug)]
pub struct DualBarOptions {
    pub gap: f64,
    /// Category value (by label) to place on the left. `None` uses the
    /// first value encountered in the category column.
    pub left: Option<String>,
    pub reverse_y: bool,
}

impl Default for DualBarOptions {
    fn default() -> Self {
        Self { gap: DEFAULT_GAP, left: None, reverse_y: false }
    }
}

/// Split rows on a two-valued `category` column and mirror the groups.
///
/// Each group keeps its original row order. The group assignment is reported
/// in [`BarGroup::key`].
pub fn dual_bar(
    dataset: &Dataset,
    magnitude: &str,
    label: &str,
    category: &str,
    opts: &DualBarOptions,
) -> Result<DualBarGeometry> {
    let mag_col = dataset.require(roles::X, magnitude)?;
    let label_col = dataset.require(roles::Y, label)?;
    let cat_col = dataset.require(roles::CATEGORY, category)?;

    let distinct = cat_col.distinct();
    if distinct.len() != 2 {
        return Err(ChartError::InvalidCategoryCardinality {
            column: category.to_string(),
            found: distinct.iter().map(|v| v.label()).collect(),
        });
    }
    let (left_key, right_key) = match &opts.left {
        None => (distinct[0], distinct[1]),
        Some(want) if distinct[0].label() == *want => (distinct[0], distinct[1]),
        Some(want) if distinct[1].label() == *want => (distinct[1], distinct[0]),
        Some(want) => {
            return Err(ChartError::UnknownCategory { column: category.to_string(), value: want.clone() })
        }
    };

    let gap = opts.gap.max(MIN_GAP);
    let magnitudes = mag_col.numeric()?;
    let mut left = group(left_key);
    let mut right = group(right_key);
    for (row, key) in cat_col.values().iter().enumerate() {
        let m = magnitudes[row].ok_or_else(|| ChartError::NonNumeric {
            column: magnitude.to_string(),
            row,
            value: String::new(),
        })?;
        let (target, sign) = if key == left_key { (&mut left, 1.0) } else { (&mut right, -1.0) };
        target.bars.push(Bar {
            label: label_col.values()[row].label(),
            magnitude: m,
            length: sign * m,
            base: sign * gap,
            text: mag_col.values()[row].label(),
        });
    }
    debug!(left = left.bars.len(), right = right.bars.len(), gap, "built dual-bar geometry");

    Ok(DualBarGeometry {
        center_labels: left.bars.iter().map(|b| b.label.clone()).collect(),
        left,
        right,
        gap,
        magnitude_title: magnitude.to_string(),
        reverse_y: opts.reverse_y,
    })
}

fn group(key: &Value) -> BarGroup {
    BarGroup { key: key.clone(), name: key.label(), bars: Vec::new() }
}
