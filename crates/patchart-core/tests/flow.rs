// File: crates/patchart-core/tests/flow.rs
// Purpose: Flow edge list: zero pruning, node layout and top-N color assignment.

use patchart_core::dataset::{Column, Dataset, Value};
use patchart_core::flow::{flow_edges, FlowOptions, NodeSide, LINK_ALPHA};
use patchart_core::theme::{hex_to_rgba, Palette, LINK_GRAY};
use patchart_core::{LINK_COLOR_LIMIT, NODE_COLOR_LIMIT};

fn matrix(n: usize) -> Dataset {
    let mut cols = vec![Column::from_texts("origin", (0..n).map(|i| format!("S{i}")))];
    cols.push(Column::from_numbers("US", (0..n).map(|i| (i + 1) as f64)));
    cols.push(Column::from_numbers("EP", (0..n).map(|i| if i % 2 == 0 { 0.0 } else { 2.0 })));
    Dataset::new(cols).unwrap()
}

#[test]
fn zero_cells_are_pruned() {
    let ds = Dataset::new(vec![
        Column::from_texts("origin", ["CN", "US"]),
        Column::from_numbers("JP", [3.0, 0.0]),
        Column::new("DE", vec![Value::number(0.0), Value::Null]),
        Column::from_numbers("KR", [-1.0, 4.0]),
    ])
    .unwrap();
    let g = flow_edges(&ds, &FlowOptions::default()).unwrap();
    assert!(g.edges.iter().all(|e| e.value != 0.0));
    let triples: Vec<_> = g.edges.iter().map(|e| (e.source, e.target, e.value)).collect();
    // Target-column major; negative cells survive.
    assert_eq!(triples, [(0, 2, 3.0), (0, 4, -1.0), (1, 4, 4.0)]);
}

#[test]
fn node_list_is_sources_then_targets() {
    let ds = matrix(4);
    let g = flow_edges(&ds, &FlowOptions::default()).unwrap();
    assert_eq!(g.nodes.len(), ds.row_count() + ds.column_count() - 1);
    assert_eq!(g.source_count(), 4);
    assert_eq!(g.nodes[4].label, "US");
    assert_eq!(g.nodes[4].side, NodeSide::Target);
    assert!(g.edges.iter().all(|e| e.source < 4 && e.target >= 4));
    assert_eq!(g.source_title, "origin");
}

#[test]
fn only_top_sources_get_palette_colors() {
    let g = flow_edges(&matrix(12), &FlowOptions::default()).unwrap();
    let palette = Palette::default();
    let colored = g.nodes[..12].iter().filter(|n| n.color != palette.fallback()).count();
    assert_eq!(colored, NODE_COLOR_LIMIT);
    // S11 has the largest outgoing total.
    assert_eq!(g.nodes[11].color, palette.colors()[0]);
}

#[test]
fn link_colors_are_opt_in_and_capped() {
    let ds = matrix(8);
    let plain = flow_edges(&ds, &FlowOptions::default()).unwrap();
    assert!(plain.edges.iter().all(|e| e.color == LINK_GRAY));

    let opts = FlowOptions { color_links: true, ..FlowOptions::default() };
    let g = flow_edges(&ds, &opts).unwrap();
    let gray = hex_to_rgba(LINK_GRAY, LINK_ALPHA);
    let tinted: std::collections::HashSet<usize> =
        g.edges.iter().filter(|e| e.color != gray).map(|e| e.source).collect();
    assert_eq!(tinted.len(), LINK_COLOR_LIMIT);
    let top = g.edges.iter().find(|e| e.source == 7).unwrap();
    assert_eq!(top.color, hex_to_rgba(Palette::default().colors()[0], LINK_ALPHA));
    // Sources outside the top five keep the translucent gray.
    let rest = g.edges.iter().find(|e| e.source == 0).unwrap();
    assert_eq!(rest.color, hex_to_rgba(LINK_GRAY, LINK_ALPHA));
    assert_eq!(rest.color, "rgba(175,175,175,0.5)");
}
