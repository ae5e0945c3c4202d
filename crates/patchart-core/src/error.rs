// File: crates/patchart-core/src/error.rs
// Summary: Error taxonomy shared by ingestion, role resolution and geometry builders.

use std::fmt;

use thiserror::Error;

pub type Result<T, E = ChartError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("column '{column}' for role '{role}' not found in dataset")]
    ColumnNotFound { role: String, column: String },

    #[error("column '{column}' must hold exactly two distinct values, found {}: [{}]", .found.len(), .found.join(", "))]
    InvalidCategoryCardinality { column: String, found: Vec<String> },

    #[error("column '{column}' has no category value '{value}'")]
    UnknownCategory { column: String, value: String },

    #[error("pivot key (category '{category}', series '{series}') appears more than once")]
    AmbiguousPivot { category: String, series: String },

    #[error("waterfall parts sum to {parts} but baseline is {baseline}")]
    UnbalancedWaterfall { baseline: f64, parts: f64 },

    #[error("invalid column roles: {}", join_issues(.0))]
    InvalidRoles(Vec<RoleIssue>),

    #[error("column '{column}' row {row}: expected a number, found '{value}'")]
    NonNumeric { column: String, row: usize, value: String },

    #[error("column '{column}' has {len} rows, expected {expected}")]
    RaggedColumns { column: String, len: usize, expected: usize },

    #[error("row {row} has {len} cells but the header has {expected}")]
    RowTooLong { row: usize, len: usize, expected: usize },

    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),

    #[error("dataset has no columns")]
    EmptyDataset,

    #[error("unknown chart kind '{0}'")]
    UnknownChartKind(String),

    #[error("unsupported input format '{0}'")]
    UnsupportedFormat(String),

    #[error("spreadsheet has no sheet named '{0}'")]
    SheetNotFound(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Workbook(#[from] calamine::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// One problem found while resolving a role selection against a dataset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoleIssue {
    Missing { role: String },
    TooMany { role: String, count: usize },
    UnknownColumn { role: String, column: String },
    UnknownRole { role: String },
}

impl fmt::Display for RoleIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleIssue::Missing { role } => write!(f, "role '{role}' is required"),
            RoleIssue::TooMany { role, count } => {
                write!(f, "role '{role}' takes one column, got {count}")
            }
            RoleIssue::UnknownColumn { role, column } => {
                write!(f, "role '{role}' refers to missing column '{column}'")
            }
            RoleIssue::UnknownRole { role } => write!(f, "role '{role}' is not used by this chart"),
        }
    }
}

fn join_issues(issues: &[RoleIssue]) -> String {
    issues.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

impl ChartError {
    pub(crate) fn column_not_found(role: &str, column: &str) -> Self {
        ChartError::ColumnNotFound { role: role.to_string(), column: column.to_string() }
    }
}
