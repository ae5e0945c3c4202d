// File: crates/patchart-core/src/lib.rs
// Summary: Core library entry point; exports dataset loading, column roles and chart geometry builders.

pub mod error;
pub mod dataset;
pub mod ingest;
pub mod roles;
pub mod reshape;
pub mod composition;
pub mod dualbar;
pub mod rank;
pub mod flow;
pub mod trend;
pub mod bubble;
pub mod theme;
pub mod types;
pub mod export;
pub mod geometry;
pub mod chart;

pub use chart::{Chart, ChartKind, ChartOptions, Figure};
pub use dataset::{Column, Dataset, Value};
pub use error::{ChartError, Result, RoleIssue};
pub use export::ExportFormat;
pub use geometry::ChartGeometry;
pub use roles::{Arity, RoleSelection, RoleSpec};
pub use theme::{Palette, Theme};
pub use types::Size;
pub use reshape::{melt, pivot_wider};
pub use flow::{flow_edges, NODE_COLOR_LIMIT, LINK_COLOR_LIMIT};
