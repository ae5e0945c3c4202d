// File: crates/patchart-core/src/roles.rs
// Summary: Typed column-role descriptors and their validation against a dataset.

use indexmap::IndexMap;
use serde::Serialize;

use crate::dataset::Dataset;
use crate::error::{ChartError, Result, RoleIssue};

pub const X: &str = "x";
pub const Y: &str = "y";
pub const VALUE: &str = "value";
pub const NAMES: &str = "names";
pub const PATH: &str = "path";
pub const COLOR: &str = "color";
pub const CATEGORY: &str = "category";
pub const LABEL: &str = "label";
pub const SERIES: &str = "series";
pub const GROUP: &str = "group";
pub const SEGMENT: &str = "segment";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Arity {
    One,
    Many,
}

/// Describes one column slot a chart consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RoleSpec {
    pub name: &'static str,
    pub arity: Arity,
    pub required: bool,
}

impl RoleSpec {
    pub const fn one(name: &'static str) -> Self {
        Self { name, arity: Arity::One, required: true }
    }

    pub const fn many(name: &'static str) -> Self {
        Self { name, arity: Arity::Many, required: true }
    }

    pub const fn optional(self) -> Self {
        Self { required: false, ..self }
    }
}

/// User's mapping of role name to column names, in selection order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoleSelection {
    roles: IndexMap<String, Vec<String>>,
}

impl RoleSelection {
    pub fn new() -> Self { Self::default() }

    /// Append `column` to `role` (builder style).
    pub fn with(mut self, role: &str, column: impl Into<String>) -> Self {
        self.push(role, column);
        self
    }

    pub fn with_many<I, S>(mut self, role: &str, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for c in columns {
            self.push(role, c);
        }
        self
    }

    pub fn push(&mut self, role: &str, column: impl Into<String>) {
        self.roles.entry(role.to_string()).or_default().push(column.into());
    }

    pub fn get(&self, role: &str) -> Option<&[String]> {
        self.roles.get(role).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.roles.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Check every role descriptor against the dataset, collecting all issues into one error.
    pub fn resolve(&self, specs: &[RoleSpec], dataset: &Dataset) -> Result<ResolvedRoles> {
        let mut issues = Vec::new();
        let mut resolved = IndexMap::new();

        for spec in specs {
            let cols = self.get(spec.name).unwrap_or(&[]);
            if cols.is_empty() {
                if spec.required {
                    issues.push(RoleIssue::Missing { role: spec.name.to_string() });
                }
                continue;
            }
            if spec.arity == Arity::One && cols.len() > 1 {
                issues.push(RoleIssue::TooMany { role: spec.name.to_string(), count: cols.len() });
            }
            for c in cols.iter().filter(|c| !dataset.has_column(c)) {
                issues.push(RoleIssue::UnknownColumn { role: spec.name.to_string(), column: c.clone() });
            }
            resolved.insert(spec.name, cols.to_vec());
        }

        for (role, _) in self.iter() {
            if !specs.iter().any(|s| s.name == role) {
                issues.push(RoleIssue::UnknownRole { role: role.to_string() });
            }
        }

        if issues.is_empty() {
            Ok(ResolvedRoles { roles: resolved })
        } else {
            Err(ChartError::InvalidRoles(issues))
        }
    }
}

/// Role selection that has passed validation against a dataset.
#[derive(Clone, Debug)]
pub struct ResolvedRoles {
    roles: IndexMap<&'static str, Vec<String>>,
}

impl ResolvedRoles {
    pub fn one(&self, role: &str) -> Result<&str> {
        self.optional(role).ok_or_else(|| {
            ChartError::InvalidRoles(vec![RoleIssue::Missing { role: role.to_string() }])
        })
    }

    pub fn optional(&self, role: &str) -> Option<&str> {
        self.roles.get(role).and_then(|v| v.first()).map(String::as_str)
    }

    pub fn many(&self, role: &str) -> &[String] {
        self.roles.get(role).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Column;

    fn dataset() -> Dataset {
        Dataset::new(vec![
            Column::from_texts("branch", ["a", "b"]),
            Column::from_numbers("count", [1.0, 2.0]),
        ])
        .unwrap()
    }

    #[test]
    fn resolves_valid_selection() {
        let specs = [RoleSpec::one(LABEL), RoleSpec::one(VALUE), RoleSpec::one(COLOR).optional()];
        let sel = RoleSelection::new().with(LABEL, "branch").with(VALUE, "count");
        let r = sel.resolve(&specs, &dataset()).unwrap();
        assert_eq!(r.one(LABEL).unwrap(), "branch");
        assert_eq!(r.optional(COLOR), None);
    }

    #[test]
    fn aggregates_every_issue() {
        let specs = [RoleSpec::one(LABEL), RoleSpec::one(VALUE), RoleSpec::many(PATH)];
        let sel = RoleSelection::new()
            .with_many(LABEL, ["branch", "count"])
            .with(VALUE, "missing")
            .with(SERIES, "branch");
        let err = sel.resolve(&specs, &dataset()).unwrap_err();
        let ChartError::InvalidRoles(issues) = err else { panic!("expected InvalidRoles") };
        assert_eq!(
            issues,
            vec![
                RoleIssue::TooMany { role: LABEL.into(), count: 2 },
                RoleIssue::UnknownColumn { role: VALUE.into(), column: "missing".into() },
                RoleIssue::Missing { role: PATH.into() },
                RoleIssue::UnknownRole { role: SERIES.into() },
            ]
        );
    }
}
