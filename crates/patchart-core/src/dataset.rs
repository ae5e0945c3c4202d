// File: crates/patchart-core/src/dataset.rs
// Summary: In-memory tabular dataset (named, equal-length columns of scalar cells).

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;

use crate::error::{ChartError, Result};

/// A single cell. NaN never appears: it is stored as `Null`.
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Number(f64),
    Text(String),
}

impl Value {
    /// Build a numeric cell, folding NaN into `Null` and -0.0 into 0.0.
    pub fn number(v: f64) -> Self {
        if v.is_nan() { Value::Null } else { Value::Number(v + 0.0) }
    }

    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    /// Infer a cell from raw text: blank -> null, numeric -> number, else text.
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim();
        if s.is_empty() {
            return Value::Null;
        }
        match s.parse::<f64>() {
            Ok(v) if v.is_finite() => Value::number(v),
            Ok(v) if v.is_nan() => Value::Null,
            _ => Value::Text(raw.to_string()),
        }
    }

    /// True for nulls and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.trim().is_empty(),
            Value::Number(_) => false,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Display label; integral numbers print without a fractional part.
    pub fn label(&self) -> String {
        self.to_string()
    }

    /// Total order used wherever distinct values are listed sorted:
    /// numbers ascending, then text lexicographically, then nulls.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a.total_cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Number(_), _) => Ordering::Less,
            (_, Value::Number(_)) => Ordering::Greater,
            (Value::Text(_), Value::Null) => Ordering::Less,
            (Value::Null, Value::Text(_)) => Ordering::Greater,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Number(a), Value::Number(b)) => a.to_bits() == b.to_bits(),
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Number(v) => v.to_bits().hash(state),
            Value::Text(s) => s.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Number(v) => f.write_str(&format_number(*v)),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self { Value::number(v) }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self { Value::number(v as f64) }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self { Value::Text(s.to_string()) }
}

impl From<String> for Value {
    fn from(s: String) -> Self { Value::Text(s) }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self { v.map(Into::into).unwrap_or(Value::Null) }
}

/// Format a number the way a spreadsheet shows it: `2020`, not `2020.0`.
pub fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    name: String,
    values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self { name: name.into(), values }
    }

    pub fn from_numbers(name: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        Self::new(name, values.into_iter().map(Value::number).collect())
    }

    pub fn from_texts<S: Into<String>>(name: impl Into<String>, values: impl IntoIterator<Item = S>) -> Self {
        Self::new(name, values.into_iter().map(|s| Value::Text(s.into())).collect())
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn values(&self) -> &[Value] { &self.values }
    pub fn len(&self) -> usize { self.values.len() }
    pub fn is_empty(&self) -> bool { self.values.is_empty() }

    /// Numeric view of the column. Nulls become `None`; text cells are an error.
    pub fn numeric(&self) -> Result<Vec<Option<f64>>> {
        self.values
            .iter()
            .enumerate()
            .map(|(row, v)| match v {
                Value::Number(x) => Ok(Some(*x)),
                Value::Null => Ok(None),
                Value::Text(s) => Err(ChartError::NonNumeric {
                    column: self.name.clone(),
                    row,
                    value: s.clone(),
                }),
            })
            .collect()
    }

    /// Distinct values in order of first appearance.
    pub fn distinct(&self) -> Vec<&Value> {
        let mut seen = HashSet::new();
        self.values.iter().filter(|v| seen.insert(*v)).collect()
    }

    /// Distinct values sorted with [`Value::sort_cmp`].
    pub fn distinct_sorted(&self) -> Vec<&Value> {
        let mut out = self.distinct();
        out.sort_by(|a, b| a.sort_cmp(b));
        out
    }

    pub fn labels(&self) -> Vec<String> {
        self.values.iter().map(Value::label).collect()
    }
}

/// Ordered, immutable collection of equal-length, uniquely named columns.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    rows: usize,
}

impl Dataset {
    /// Contract: at least one column, all columns the same length, names unique.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let first = columns.first().ok_or(ChartError::EmptyDataset)?;
        let rows = first.len();
        let mut names = HashSet::new();
        for c in &columns {
            if c.len() != rows {
                return Err(ChartError::RaggedColumns { column: c.name.clone(), len: c.len(), expected: rows });
            }
            if !names.insert(c.name.as_str()) {
                return Err(ChartError::DuplicateColumn(c.name.clone()));
            }
        }
        Ok(Self { columns, rows })
    }

    /// Build from a header row and row-major cells. Short rows are padded with
    /// nulls; a row longer than the header is `RowTooLong`.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let mut cols: Vec<Vec<Value>> = vec![Vec::with_capacity(rows.len()); headers.len()];
        for (r, row) in rows.into_iter().enumerate() {
            if row.len() > headers.len() {
                return Err(ChartError::RowTooLong { row: r, len: row.len(), expected: headers.len() });
            }
            let mut cells = row.into_iter();
            for col in cols.iter_mut() {
                col.push(cells.next().unwrap_or(Value::Null));
            }
        }
        let columns = headers.into_iter().zip(cols).map(|(h, v)| Column::new(h, v)).collect();
        Self::new(columns)
    }

    pub fn columns(&self) -> &[Column] { &self.columns }
    pub fn row_count(&self) -> usize { self.rows }
    pub fn column_count(&self) -> usize { self.columns.len() }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Look up the column bound to `role`, failing with `ColumnNotFound`.
    pub fn require(&self, role: &str, name: &str) -> Result<&Column> {
        self.column(name).ok_or_else(|| ChartError::column_not_found(role, name))
    }

    /// First `n` rows, for previews.
    pub fn head(&self, n: usize) -> Dataset {
        let n = n.min(self.rows);
        let columns = self
            .columns
            .iter()
            .map(|c| Column::new(c.name.clone(), c.values[..n].to_vec()))
            .collect();
        Dataset { columns, rows: n }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_infers_cell_types() {
        assert_eq!(Value::parse("  "), Value::Null);
        assert_eq!(Value::parse("42"), Value::Number(42.0));
        assert_eq!(Value::parse("-0"), Value::Number(0.0));
        assert_eq!(Value::parse("NaN"), Value::Null);
        assert_eq!(Value::parse("China"), Value::text("China"));
    }

    #[test]
    fn integral_numbers_label_without_fraction() {
        assert_eq!(Value::number(2020.0).label(), "2020");
        assert_eq!(Value::number(2.5).label(), "2.5");
        assert_eq!(Value::Null.label(), "");
    }

    #[test]
    fn new_rejects_ragged_and_duplicate_columns() {
        let ragged = Dataset::new(vec![
            Column::from_numbers("a", [1.0, 2.0]),
            Column::from_numbers("b", [1.0]),
        ]);
        assert!(matches!(ragged, Err(ChartError::RaggedColumns { .. })));

        let dup = Dataset::new(vec![Column::from_numbers("a", [1.0]), Column::from_numbers("a", [2.0])]);
        assert!(matches!(dup, Err(ChartError::DuplicateColumn(name)) if name == "a"));

        assert!(matches!(Dataset::new(Vec::new()), Err(ChartError::EmptyDataset)));
    }

    #[test]
    fn from_rows_pads_short_rows_and_rejects_long_ones() {
        let headers = vec!["a".to_string(), "b".to_string()];
        let ds = Dataset::from_rows(headers.clone(), vec![vec![Value::number(1.0)]]).unwrap();
        assert_eq!(ds.column("b").unwrap().values(), &[Value::Null]);

        let long = vec![
            vec![Value::number(1.0), Value::number(2.0)],
            vec![Value::number(1.0), Value::number(2.0), Value::number(3.0)],
        ];
        let err = Dataset::from_rows(headers, long).unwrap_err();
        assert!(matches!(err, ChartError::RowTooLong { row: 1, len: 3, expected: 2 }));
    }

    #[test]
    fn distinct_keeps_first_seen_order() {
        let c = Column::from_texts("region", ["domestic", "foreign", "domestic"]);
        let d: Vec<String> = c.distinct().into_iter().map(Value::label).collect();
        assert_eq!(d, ["domestic", "foreign"]);
    }

    #[test]
    fn numeric_rejects_text_and_keeps_nulls() {
        let c = Column::new("v", vec![Value::number(1.0), Value::Null]);
        assert_eq!(c.numeric().unwrap(), vec![Some(1.0), None]);
        let bad = Column::new("v", vec![Value::text("x")]);
        assert!(matches!(bad.numeric(), Err(ChartError::NonNumeric { row: 0, .. })));
    }

    #[test]
    fn head_truncates_rows() {
        let ds = Dataset::new(vec![Column::from_numbers("a", [1.0, 2.0, 3.0, 4.0])]).unwrap();
        let h = ds.head(3);
        assert_eq!(h.row_count(), 3);
        assert_eq!(ds.head(10).row_count(), 4);
    }
}
