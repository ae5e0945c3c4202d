// File: crates/patchart-core/tests/ingest.rs
// Purpose: Workbook ingestion (calamine) and extension dispatch in `Dataset::load`.

use std::path::PathBuf;

use anyhow::Result;
use patchart_core::dataset::Value;
use patchart_core::{roles, Chart, ChartError, ChartKind, Dataset};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/patents.xlsx")
}

#[test]
fn lists_sheets_in_workbook_order() -> Result<()> {
    assert_eq!(Dataset::sheet_names(fixture())?, ["trend", "flow"]);
    Ok(())
}

#[test]
fn first_sheet_is_the_default() -> Result<()> {
    let ds = Dataset::from_workbook(fixture(), None)?;
    // Numeric header cells become plain labels.
    assert_eq!(ds.column_names(), ["office", "2020", "2021"]);
    assert_eq!(ds.row_count(), 2);
    assert_eq!(ds.column("office").unwrap().values(), &[Value::text("CN"), Value::text("US")]);
    assert_eq!(ds.column("2021").unwrap().values(), &[Value::number(14.5), Value::Null]);
    assert_eq!(ds.column("2020").unwrap().numeric()?, vec![Some(10.0), Some(7.0)]);
    Ok(())
}

#[test]
fn named_sheet_feeds_a_chart() -> Result<()> {
    let ds = Dataset::from_workbook(fixture(), Some("flow"))?;
    assert_eq!(ds.column_names(), ["origin", "US", "EP"]);
    let fig = Chart::new(ChartKind::Sankey).build(&ds)?;
    assert_eq!(fig.geometry.mark_count(), 3);
    Ok(())
}

#[test]
fn unknown_sheet_is_reported() {
    let err = Dataset::from_workbook(fixture(), Some("rank")).unwrap_err();
    assert!(matches!(err, ChartError::SheetNotFound(ref name) if name == "rank"));
}

#[test]
fn load_dispatches_on_xlsx_extension() -> Result<()> {
    let ds = Dataset::load(fixture(), Some("trend"))?;
    assert_eq!(ds, Dataset::from_workbook(fixture(), None)?);
    let fig = Chart::new(ChartKind::Pie).with_role(roles::NAMES, "office").with_role(roles::VALUE, "2020").build(&ds)?;
    assert_eq!(fig.geometry.mark_count(), 2);
    Ok(())
}

#[test]
fn unrecognised_extension_falls_back_to_workbook() -> Result<()> {
    let path = std::env::temp_dir().join(format!("patchart-fallback-{}.dat", std::process::id()));
    std::fs::copy(fixture(), &path)?;
    let loaded = Dataset::load(&path, None);
    std::fs::remove_file(&path)?;
    assert_eq!(loaded?.column_names(), ["office", "2020", "2021"]);
    Ok(())
}

#[test]
fn unreadable_file_is_unsupported() -> Result<()> {
    let path = std::env::temp_dir().join(format!("patchart-garbage-{}.dat", std::process::id()));
    std::fs::write(&path, [0xffu8, 0xfe, 0x00, 0x81, b'\n'])?;
    let loaded = Dataset::load(&path, None);
    std::fs::remove_file(&path)?;
    assert!(matches!(loaded, Err(ChartError::UnsupportedFormat(_))));
    Ok(())
}

#[test]
fn overlong_csv_row_is_an_error() {
    let err = Dataset::from_csv_reader("a,b\n1,2,3\n".as_bytes()).unwrap_err();
    assert!(matches!(err, ChartError::RowTooLong { row: 0, len: 3, expected: 2 }));
}
