// File: crates/patchart-core/tests/dualbar.rs
// Purpose: Dual-bar grouping: first-seen left group, mirrored offsets, cardinality errors.

use patchart_core::dataset::{Column, Dataset, Value};
use patchart_core::dualbar::{dual_bar, DualBarOptions};
use patchart_core::ChartError;

fn table(cats: &[&str]) -> Dataset {
    let n = cats.len();
    Dataset::new(vec![
        Column::from_numbers("count", (1..=n).map(|i| i as f64 * 10.0)),
        Column::from_texts("assignee", (0..n).map(|i| format!("co{i}"))),
        Column::from_texts("kind", cats.iter().copied()),
    ])
    .unwrap()
}

#[test]
fn groups_partition_all_rows() {
    let ds = table(&["grant", "app", "app", "grant", "app"]);
    let g = dual_bar(&ds, "count", "assignee", "kind", &DualBarOptions::default()).unwrap();
    assert_eq!(g.left.bars.len() + g.right.bars.len(), ds.row_count());
    assert_eq!(g.left.key, Value::text("grant"));
    // Original row order within each group.
    let right: Vec<_> = g.right.bars.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(right, ["co1", "co2", "co4"]);
}

#[test]
fn first_seen_value_is_left() {
    let a = dual_bar(&table(&["grant", "app"]), "count", "assignee", "kind", &DualBarOptions::default()).unwrap();
    let b = dual_bar(&table(&["app", "grant"]), "count", "assignee", "kind", &DualBarOptions::default()).unwrap();
    assert_eq!(a.left.key, b.right.key);
    assert_eq!(a.right.key, b.left.key);
}

#[test]
fn offsets_mirror_around_gap() {
    let opts = DualBarOptions { gap: 30.0, ..DualBarOptions::default() };
    let g = dual_bar(&table(&["grant", "app"]), "count", "assignee", "kind", &opts).unwrap();
    let l = &g.left.bars[0];
    let r = &g.right.bars[0];
    assert_eq!((l.base, l.length, l.end()), (30.0, 10.0, 40.0));
    assert_eq!((r.base, r.length, r.end()), (-30.0, -20.0, -50.0));
    assert_eq!(r.magnitude, 20.0);
}

#[test]
fn pinned_left_value_overrides_scan_order() {
    let opts = DualBarOptions { left: Some("app".into()), ..DualBarOptions::default() };
    let g = dual_bar(&table(&["grant", "app"]), "count", "assignee", "kind", &opts).unwrap();
    assert_eq!(g.left.name, "app");

    let opts = DualBarOptions { left: Some("lapsed".into()), ..DualBarOptions::default() };
    let err = dual_bar(&table(&["grant", "app"]), "count", "assignee", "kind", &opts).unwrap_err();
    assert!(matches!(err, ChartError::UnknownCategory { .. }));
}

#[test]
fn needs_exactly_two_categories() {
    for cats in [&["grant", "grant"][..], &["a", "b", "c"][..]] {
        let err = dual_bar(&table(cats), "count", "assignee", "kind", &DualBarOptions::default()).unwrap_err();
        assert!(matches!(err, ChartError::InvalidCategoryCardinality { .. }), "{cats:?}: {err:?}");
    }
}

#[test]
fn gap_has_a_floor() {
    let opts = DualBarOptions { gap: 0.0, ..DualBarOptions::default() };
    let g = dual_bar(&table(&["grant", "app"]), "count", "assignee", "kind", &opts).unwrap();
    assert_eq!(g.gap, patchart_core::dualbar::MIN_GAP);
    assert_eq!(g.left.bars[0].base, 10.0);
}
