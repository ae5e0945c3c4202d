// File: crates/patchart-core/src/ingest.rs
// Summary: Dataset loading from delimited text (csv) and spreadsheets (calamine).

use std::io::Read;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use tracing::{debug, warn};

use crate::dataset::{Dataset, Value};
use crate::error::{ChartError, Result};

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

impl Dataset {
    /// Parse comma-separated text with a header row.
    pub fn from_csv_reader<R: Read>(rdr: R) -> Result<Self> {
        Self::from_delimited_reader(rdr, b',')
    }

    pub fn from_delimited_reader<R: Read>(rdr: R, delimiter: u8) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(rdr);

        let headers = header_names(rdr.headers()?.iter());
        let mut rows = Vec::new();
        for rec in rdr.records() {
            let rec = rec?;
            rows.push(rec.iter().map(Value::parse).collect());
        }
        let ds = Dataset::from_rows(headers, rows)?;
        debug!(rows = ds.row_count(), columns = ds.column_count(), "parsed delimited text");
        Ok(ds)
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let delimiter = match extension(path).as_deref() {
            Some("tsv") | Some("tab") => b'\t',
            _ => b',',
        };
        let file = std::fs::File::open(path)?;
        Self::from_delimited_reader(std::io::BufReader::new(file), delimiter)
    }

    /// Worksheet names in workbook order.
    pub fn sheet_names(path: impl AsRef<Path>) -> Result<Vec<String>> {
        let workbook = open_workbook_auto(path.as_ref())?;
        Ok(workbook.sheet_names())
    }

    /// Read one worksheet; `None` selects the first sheet.
    pub fn from_workbook(path: impl AsRef<Path>, sheet: Option<&str>) -> Result<Self> {
        let mut workbook = open_workbook_auto(path.as_ref())?;
        let names = workbook.sheet_names();
        let name = match sheet {
            Some(s) if names.iter().any(|n| n == s) => s.to_string(),
            Some(s) => return Err(ChartError::SheetNotFound(s.to_string())),
            None => names.first().cloned().ok_or(ChartError::EmptyDataset)?,
        };
        let range = workbook.worksheet_range(&name)?;

        let mut rows = range.rows();
        let header = rows.next().ok_or(ChartError::EmptyDataset)?;
        let headers = header_names(header.iter().map(|c| cell_value(c).label()));
        let body = rows.map(|r| r.iter().map(cell_value).collect()).collect();
        let ds = Dataset::from_rows(headers, body)?;
        debug!(sheet = %name, rows = ds.row_count(), columns = ds.column_count(), "parsed worksheet");
        Ok(ds)
    }

    /// Load by extension. Files that are not recognisably delimited text or
    /// workbooks are tried as CSV first, then as a workbook.
    pub fn load(path: impl AsRef<Path>, sheet: Option<&str>) -> Result<Self> {
        let path = path.as_ref();
        match extension(path).as_deref() {
            Some("csv") | Some("tsv") | Some("tab") | Some("txt") => Self::from_csv_path(path),
            Some(ext) if WORKBOOK_EXTENSIONS.contains(&ext) => Self::from_workbook(path, sheet),
            _ => match Self::from_csv_path(path) {
                Ok(ds) => Ok(ds),
                Err(err @ ChartError::Io(_)) => Err(err),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "not delimited text, trying workbook");
                    Self::from_workbook(path, sheet).map_err(|_| {
                        ChartError::UnsupportedFormat(path.display().to_string())
                    })
                }
            },
        }
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().to_lowercase())
}

/// Header cells are kept verbatim; blank headers get a positional name.
fn header_names<I, S>(cells: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    cells
        .into_iter()
        .enumerate()
        .map(|(i, h)| {
            let h = h.as_ref();
            if h.trim().is_empty() { format!("Unnamed: {i}") } else { h.to_string() }
        })
        .collect()
}

fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Int(v) => Value::number(*v as f64),
        Data::Float(v) => Value::number(*v),
        Data::String(s) => Value::parse(s),
        Data::Empty | Data::Error(_) => Value::Null,
        other => Value::Text(other.to_string()),
    }
}
