use super::{load_reports, Selection};
use crate::metrics::{MetricsCollector, Stage};
use crate::output::{csv, html, json, rss, OUTPUT_STEM};
use crate::reports::StateReport;
use clap::ValueEnum;
use colored::*;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Html,
    Rss,
    Json,
    All,
}

impl ExportFormat {
    fn expand(self) -> Vec<ExportFormat> {
        match self {
            ExportFormat::All => vec![
                ExportFormat::Csv,
                ExportFormat::Html,
                ExportFormat::Rss,
                ExportFormat::Json,
            ],
            single => vec![single],
        }
    }

    fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Html | ExportFormat::All => "html",
            ExportFormat::Rss => "xml",
            ExportFormat::Json => "json",
        }
    }
}

/// Write the requested formats for already summarized reports.
fn write_outputs(
    reports: &[StateReport],
    out_dir: &Path,
    format: ExportFormat,
    rss_limit: usize,
) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    fs::create_dir_all(out_dir)?;

    let mut written = Vec::new();
    for format in format.expand() {
        let path = out_dir.join(format!("{}.{}", OUTPUT_STEM, format.extension()));
        match format {
            ExportFormat::Csv => csv::write_csv(reports, &path)?,
            ExportFormat::Html => html::write_html(reports, &path)?,
            ExportFormat::Rss => rss::write_rss(reports, &path, rss_limit)?,
            ExportFormat::Json => json::write_json(reports, &path)?,
            ExportFormat::All => unreachable!("expanded above"),
        }
        written.push(path);
    }
    Ok(written)
}

pub fn export(
    snapshot_dir: &Path,
    out_dir: &Path,
    selection: &Selection,
    format: ExportFormat,
    rss_limit: usize,
    timings: bool,
) -> Result<(), Box<dyn Error>> {
    let mut metrics = MetricsCollector::new();
    let reports = load_reports(snapshot_dir, selection, &mut metrics)?;

    metrics.start_stage(Stage::Rendering);
    let written = write_outputs(&reports, out_dir, format, rss_limit)?;
    metrics.end_stage(Stage::Rendering, Some(written.len() as u64));

    for path in &written {
        println!("✅ Wrote {}", path.display().to_string().bright_green());
    }

    if timings {
        metrics.print_summary();
    }

    Ok(())
}
