// File: crates/demo/src/main.rs
// Summary: Demo loads a CSV/TSV/workbook table, builds one chart from column roles and writes the figure JSON.

use anyhow::{bail, Context, Result};
use clap::Parser;
use patchart_core::chart::ChartOptions;
use patchart_core::composition::TextInfo;
use patchart_core::rank::BarMode;
use patchart_core::{Chart, ChartKind, Dataset, ExportFormat, Palette, Size};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "patchart-demo", about = "Build chart geometry from a table")]
struct Cli {
    /// Input table (.csv, .tsv, .xlsx, .xls, .ods)
    input: PathBuf,

    /// Chart kind, e.g. trend, pie, treemap, dual_bar, sankey
    #[arg(short, long, value_parser = parse_kind)]
    kind: ChartKind,

    /// Column role as role=column; repeat for multi-column roles
    #[arg(short, long = "role", value_parser = parse_role)]
    roles: Vec<(String, String)>,

    /// Worksheet name (workbooks only; first sheet by default)
    #[arg(long)]
    sheet: Option<String>,

    /// Print the workbook's sheet names and exit
    #[arg(long)]
    list_sheets: bool,

    #[arg(long, default_value = "svg", value_parser = parse_format)]
    format: ExportFormat,

    /// Figure size as WIDTHxHEIGHT; page default when omitted
    #[arg(long, value_parser = parse_size)]
    size: Option<Size>,

    /// Qualitative palette: plotly or d3
    #[arg(long, default_value = "plotly")]
    palette: String,

    /// Line color for trend charts
    #[arg(long)]
    color: Option<String>,

    /// Treemap/sunburst text fields, e.g. label,value
    #[arg(long, value_delimiter = ',', value_parser = parse_text_info)]
    text_info: Vec<TextInfo>,

    #[arg(long)]
    inside_label: bool,

    #[arg(long)]
    hole: bool,

    /// Center gap for dual-bar charts
    #[arg(long)]
    gap: Option<f64>,

    /// Category value to place on the left of a dual-bar chart
    #[arg(long)]
    left: Option<String>,

    /// Rank bar mode: group or relative
    #[arg(long, value_parser = parse_bar_mode)]
    bar_mode: Option<BarMode>,

    #[arg(long)]
    vertical: bool,

    #[arg(long)]
    reverse: bool,

    #[arg(long)]
    labels: bool,

    /// Tint Sankey links by source color
    #[arg(long)]
    color_links: bool,

    /// Output directory
    #[arg(short, long, default_value = "target/out")]
    out: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let (path, used_alt) = resolve_path(&cli.input)?;
    if used_alt {
        info!(path = %path.display(), "extension swapped between .csv/.cvs");
    }

    if cli.list_sheets {
        for name in Dataset::sheet_names(&path).with_context(|| format!("failed to read workbook '{}'", path.display()))? {
            println!("{name}");
        }
        return Ok(());
    }

    let dataset = Dataset::load(&path, cli.sheet.as_deref())
        .with_context(|| format!("failed to load table '{}'", path.display()))?;
    info!(rows = dataset.row_count(), columns = ?dataset.column_names(), "loaded table");

    let mut chart = Chart::new(cli.kind).with_options(options(&cli));
    for (role, column) in &cli.roles {
        chart = chart.with_role(role, column.as_str());
    }
    let figure = chart.build(&dataset).with_context(|| format!("failed to build {} chart", cli.kind))?;

    std::fs::create_dir_all(&cli.out).with_context(|| format!("failed to create '{}'", cli.out.display()))?;
    let out = cli.out.join(format!("{}.json", cli.kind));
    let json = serde_json::to_string_pretty(&figure)?;
    std::fs::write(&out, json).with_context(|| format!("failed to write '{}'", out.display()))?;
    let pixels = figure.size.scaled(figure.export_scale);
    info!(
        file = %out.display(),
        export = %figure.file_name,
        mime = figure.export.mime(),
        width = pixels.width,
        height = pixels.height,
        marks = figure.geometry.mark_count(),
        "wrote figure"
    );
    Ok(())
}

fn options(cli: &Cli) -> ChartOptions {
    let mut o = ChartOptions { size: cli.size, export: cli.format, ..ChartOptions::default() };
    o.theme.palette = Palette::find(&cli.palette);
    if let Some(c) = &cli.color {
        o.line_color = c.clone();
    }
    if !cli.text_info.is_empty() {
        o.text_info = cli.text_info.clone();
    }
    o.pie.inside_label = cli.inside_label;
    o.pie.hole = cli.hole;
    if let Some(gap) = cli.gap {
        o.dual_bar.gap = gap;
    }
    o.dual_bar.left = cli.left.clone();
    o.dual_bar.reverse_y = cli.reverse;
    if let Some(mode) = cli.bar_mode {
        o.rank.bar_mode = mode;
    }
    o.rank.vertical = cli.vertical;
    o.rank.reverse_axis = cli.reverse;
    o.bubble.show_labels = cli.labels;
    o.pie_bubble.show_labels = cli.labels;
    o.flow.color_links = cli.color_links;
    o
}

/// Use `p` if it exists, otherwise try the .csv/.cvs twin.
fn resolve_path(p: &Path) -> Result<(PathBuf, bool)> {
    if p.exists() {
        return Ok((p.to_path_buf(), false));
    }
    if let Some(alt) = swap_ext(p).filter(|a| a.exists()) {
        return Ok((alt, true));
    }
    bail!("input file '{}' not found", p.display())
}

fn swap_ext(p: &Path) -> Option<PathBuf> {
    let mut alt = p.to_path_buf();
    match p.extension()?.to_string_lossy().to_lowercase().as_str() {
        "cvs" => alt.set_extension("csv"),
        "csv" => alt.set_extension("cvs"),
        _ => return None,
    };
    Some(alt)
}

fn parse_kind(s: &str) -> Result<ChartKind, String> {
    s.parse().map_err(|e: patchart_core::ChartError| e.to_string())
}

fn parse_format(s: &str) -> Result<ExportFormat, String> {
    s.parse().map_err(|e: patchart_core::ChartError| e.to_string())
}

fn parse_role(s: &str) -> Result<(String, String), String> {
    let (role, column) = s.split_once('=').ok_or_else(|| format!("expected role=column, got '{s}'"))?;
    Ok((role.trim().to_string(), column.trim().to_string()))
}

fn parse_size(s: &str) -> Result<Size, String> {
    let (w, h) = s.split_once(['x', 'X']).ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let w: f64 = w.trim().parse().map_err(|e| format!("width: {e}"))?;
    let h: f64 = h.trim().parse().map_err(|e| format!("height: {e}"))?;
    if w <= 0.0 || h <= 0.0 {
        return Err("size must be positive".into());
    }
    Ok(Size::new(w, h))
}

fn parse_text_info(s: &str) -> Result<TextInfo, String> {
    TextInfo::parse(s).ok_or_else(|| format!("unknown text field '{s}'"))
}

fn parse_bar_mode(s: &str) -> Result<BarMode, String> {
    BarMode::parse(s).ok_or_else(|| format!("unknown bar mode '{s}'"))
}
