use super::{load_reports, Selection};
use crate::metrics::{MetricsCollector, Stage};
use crate::output::console;
use std::error::Error;
use std::path::Path;

pub fn summarize(
    snapshot_dir: &Path,
    selection: &Selection,
    timings: bool,
) -> Result<(), Box<dyn Error>> {
    let mut metrics = MetricsCollector::new();
    let reports = load_reports(snapshot_dir, selection, &mut metrics)?;

    metrics.start_stage(Stage::Rendering);
    for report in &reports {
        console::print_report(report);
    }
    metrics.end_stage(Stage::Rendering, Some(reports.len() as u64));

    if timings {
        metrics.print_summary();
    }

    Ok(())
}
