// File: crates/patchart-core/src/composition.rs
// Summary: Part-to-whole geometry: pie slices, treemap/sunburst hierarchies and waterfall deltas.

use serde::Serialize;
use tracing::{debug, warn};

use crate::dataset::{Dataset, Value};
use crate::error::{ChartError, Result, RoleIssue};
use crate::roles;
use crate::theme;

/// Donut hole as a fraction of the radius.
pub const HOLE_RATIO: f64 = 0.4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompositionKind {
    Pie,
    Treemap,
    Sunburst,
}

/// What each treemap/sunburst tile prints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TextInfo {
    #[serde(rename = "label")]
    Label,
    #[serde(rename = "value")]
    Value,
    #[serde(rename = "percent parent")]
    PercentParent,
    #[serde(rename = "percent root")]
    PercentRoot,
}

impl TextInfo {
    pub fn as_str(self) -> &'static str {
        match self {
            TextInfo::Label => "label",
            TextInfo::Value => "value",
            TextInfo::PercentParent => "percent parent",
            TextInfo::PercentRoot => "percent root",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "label" => Some(TextInfo::Label),
            "value" => Some(TextInfo::Value),
            "percent parent" | "percent-parent" => Some(TextInfo::PercentParent),
            "percent root" | "percent-root" => Some(TextInfo::PercentRoot),
            _ => None,
        }
    }

    /// `label+value`-style field string; an empty selection falls back to `label`.
    pub fn join(items: &[TextInfo]) -> String {
        if items.is_empty() {
            return TextInfo::Label.as_str().to_string();
        }
        items.iter().map(|t| t.as_str()).collect::<Vec<_>>().join("+")
    }
}

/// Nesting levels, outermost first, and each row's path through them.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Hierarchy {
    pub levels: Vec<String>,
    pub paths: Vec<Vec<Value>>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CompositionGeometry {
    pub kind: CompositionKind,
    pub labels: Vec<String>,
    pub values: Vec<Option<f64>>,
    pub hierarchy: Option<Hierarchy>,
    pub color_groups: Option<Vec<Value>>,
    pub text_info: String,
    pub inside_labels: bool,
    pub hole: Option<f64>,
    pub clockwise: bool,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PieOptions {
    /// Print `percent+label` inside each slice and drop the legend.
    pub inside_label: bool,
    /// Draw as a donut.
    pub hole: bool,
}

/// Pie slices from a names column and a values column.
pub fn pie(dataset: &Dataset, names: &str, values: &str, opts: PieOptions) -> Result<CompositionGeometry> {
    let names_col = dataset.require(roles::NAMES, names)?;
    let values_col = dataset.require(roles::VALUE, values)?;
    let values = values_col.numeric()?;
    debug!(slices = values.len(), "built pie geometry");

    Ok(CompositionGeometry {
        kind: CompositionKind::Pie,
        labels: names_col.labels(),
        values,
        hierarchy: None,
        color_groups: None,
        text_info: if opts.inside_label { "percent+label".into() } else { "percent".into() },
        inside_labels: opts.inside_label,
        hole: opts.hole.then_some(HOLE_RATIO),
        clockwise: true,
    })
}

/// Treemap/sunburst input. `path` is outermost-first and its order is kept as given.
///
/// Every referenced column is checked before anything is built. Rows with blank
/// path segments are kept; the renderer decides how gaps are shown.
pub fn hierarchy(
    dataset: &Dataset,
    kind: CompositionKind,
    path: &[String],
    value: &str,
    color: &str,
    text_info: &[TextInfo],
) -> Result<CompositionGeometry> {
    let path_cols = path
        .iter()
        .map(|p| dataset.require(roles::PATH, p))
        .collect::<Result<Vec<_>>>()?;
    let value_col = dataset.require(roles::VALUE, value)?;
    let color_col = dataset.require(roles::COLOR, color)?;
    if path_cols.is_empty() {
        return Err(ChartError::InvalidRoles(vec![RoleIssue::Missing { role: roles::PATH.into() }]));
    }
    let values = value_col.numeric()?;

    let paths: Vec<Vec<Value>> = (0..dataset.row_count())
        .map(|r| path_cols.iter().map(|c| c.values()[r].clone()).collect())
        .collect();
    let gaps = paths.iter().filter(|p| p.iter().any(Value::is_blank)).count();
    if gaps > 0 {
        warn!(rows = gaps, "hierarchy rows with blank path segments");
    }
    let labels = paths
        .iter()
        .map(|p| p.last().map(Value::label).unwrap_or_default())
        .collect();
    debug!(levels = path.len(), leaves = paths.len(), "built hierarchy geometry");

    Ok(CompositionGeometry {
        kind,
        labels,
        values,
        hierarchy: Some(Hierarchy { levels: path.to_vec(), paths }),
        color_groups: Some(color_col.values().to_vec()),
        text_info: TextInfo::join(text_info),
        inside_labels: true,
        hole: None,
        clockwise: false,
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Measure {
    Absolute,
    Relative,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WaterfallStep {
    pub label: String,
    pub delta: f64,
    pub measure: Measure,
    /// Original value, no decimals.
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WaterfallGeometry {
    pub steps: Vec<WaterfallStep>,
    pub value_title: String,
    pub bar_color: String,
    pub text_color: String,
}

impl WaterfallGeometry {
    pub fn deltas(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.delta).collect()
    }

    /// Strict check that the parts consume exactly the baseline. The builder
    /// never calls this as a gate; callers opt in.
    pub fn check_balance(&self, tolerance: f64) -> Result<()> {
        let Some((first, rest)) = self.steps.split_first() else { return Ok(()) };
        let parts: f64 = -rest.iter().map(|s| s.delta).sum::<f64>();
        if (first.delta - parts).abs() > tolerance {
            return Err(ChartError::UnbalancedWaterfall { baseline: first.delta, parts });
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct WaterfallStyle {
    pub bar_color: String,
    pub text_color: String,
}

impl Default for WaterfallStyle {
    fn default() -> Self {
        Self { bar_color: theme::WATERFALL_BAR.into(), text_color: theme::WATERFALL_TEXT.into() }
    }
}

/// Row 0 is the absolute total; every later row is consumed from it, so its
/// value is negated whatever its sign.
pub fn waterfall(dataset: &Dataset, x: &str, y: &str, style: &WaterfallStyle) -> Result<WaterfallGeometry> {
    let x_col = dataset.require(roles::X, x)?;
    let y_col = dataset.require(roles::Y, y)?;

    let mut steps = Vec::with_capacity(dataset.row_count());
    for (row, v) in y_col.numeric()?.into_iter().enumerate() {
        let v = v.ok_or_else(|| ChartError::NonNumeric {
            column: y.to_string(),
            row,
            value: String::new(),
        })?;
        let (delta, measure) = if row == 0 { (v, Measure::Absolute) } else { (-v, Measure::Relative) };
        steps.push(WaterfallStep {
            label: x_col.values()[row].label(),
            delta,
            measure,
            text: format!("{v:.0}"),
        });
    }

    let geom = WaterfallGeometry {
        steps,
        value_title: y.to_string(),
        bar_color: style.bar_color.clone(),
        text_color: style.text_color.clone(),
    };
    if let Err(err) = geom.check_balance(1e-9) {
        warn!(%err, "waterfall parts do not match baseline");
    }
    Ok(geom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_info_join_defaults_to_label() {
        assert_eq!(TextInfo::join(&[]), "label");
        assert_eq!(TextInfo::join(&[TextInfo::Label, TextInfo::PercentRoot]), "label+percent root");
        assert_eq!(TextInfo::parse("Percent Parent"), Some(TextInfo::PercentParent));
    }

    #[test]
    fn check_balance_flags_mismatch() {
        let step = |label: &str, delta: f64, measure| WaterfallStep { label: label.into(), delta, measure, text: String::new() };
        let g = WaterfallGeometry {
            steps: vec![step("Total", 100.0, Measure::Absolute), step("A", -30.0, Measure::Relative)],
            value_title: "n".into(),
            bar_color: String::new(),
            text_color: String::new(),
        };
        let err = g.check_balance(1e-9).unwrap_err();
        assert!(matches!(err, ChartError::UnbalancedWaterfall { baseline, parts } if baseline == 100.0 && parts == 30.0));
    }
}
