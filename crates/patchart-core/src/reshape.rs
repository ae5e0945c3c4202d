// File: crates/patchart-core/src/reshape.rs
// Summary: Long/wide reshaping (melt and pivot) over `Dataset`.

use std::collections::HashMap;

use tracing::debug;

use crate::dataset::{Column, Dataset, Value};
use crate::error::{ChartError, Result};
use crate::roles;

/// Header of the melted column that holds the former column names.
pub const VARIABLE: &str = "variable";
/// Header of the melted column that holds the cell values.
pub const VALUE: &str = "value";

/// Wide -> long. Emits `(id, variable, value)` rows, value-column major:
/// every row of the first value column, then every row of the second, and so on.
///
/// An empty `value_columns` melts every column except `id`.
pub fn melt(dataset: &Dataset, id: &str, value_columns: &[String]) -> Result<Dataset> {
    let id_col = dataset.require(roles::X, id)?;
    let value_cols: Vec<&Column> = if value_columns.is_empty() {
        dataset.columns().iter().filter(|c| c.name() != id).collect()
    } else {
        value_columns
            .iter()
            .map(|name| dataset.require(roles::Y, name))
            .collect::<Result<_>>()?
    };

    let n = dataset.row_count() * value_cols.len();
    let mut ids = Vec::with_capacity(n);
    let mut vars = Vec::with_capacity(n);
    let mut vals = Vec::with_capacity(n);
    for col in &value_cols {
        for (row, v) in col.values().iter().enumerate() {
            ids.push(id_col.values()[row].clone());
            vars.push(Value::text(col.name()));
            vals.push(v.clone());
        }
    }
    debug!(rows = n, value_columns = value_cols.len(), "melted wide table");

    Dataset::new(vec![
        Column::new(id, ids),
        Column::new(VARIABLE, vars),
        Column::new(VALUE, vals),
    ])
}

/// Long -> wide. One output row per distinct `index` value (first-seen order),
/// one output column per distinct `columns` value (sorted). Missing cells are null.
///
/// Fails with `AmbiguousPivot` when an `(index, columns)` pair occurs twice;
/// duplicates are never aggregated.
pub fn pivot_wider(dataset: &Dataset, index: &str, columns: &str, values: &str) -> Result<Dataset> {
    let index_col = dataset.require(roles::CATEGORY, index)?;
    let key_col = dataset.require(roles::SERIES, columns)?;
    let value_col = dataset.require(roles::VALUE, values)?;

    let rows: Vec<&Value> = index_col.distinct();
    let keys: Vec<&Value> = key_col.distinct_sorted();
    let row_pos: HashMap<&Value, usize> = rows.iter().enumerate().map(|(i, v)| (*v, i)).collect();
    let key_pos: HashMap<&Value, usize> = keys.iter().enumerate().map(|(i, v)| (*v, i)).collect();

    let mut cells: Vec<Vec<Option<&Value>>> = vec![vec![None; rows.len()]; keys.len()];
    for r in 0..dataset.row_count() {
        let ri = row_pos[&index_col.values()[r]];
        let ki = key_pos[&key_col.values()[r]];
        let slot = &mut cells[ki][ri];
        if slot.is_some() {
            return Err(ChartError::AmbiguousPivot {
                category: rows[ri].label(),
                series: keys[ki].label(),
            });
        }
        *slot = Some(&value_col.values()[r]);
    }

    let mut out = Vec::with_capacity(keys.len() + 1);
    out.push(Column::new(index, rows.iter().map(|v| (*v).clone()).collect()));
    for (key, col) in keys.iter().zip(cells) {
        let values = col.into_iter().map(|c| c.cloned().unwrap_or(Value::Null)).collect();
        out.push(Column::new(key.label(), values));
    }
    Dataset::new(out)
}
