use super::{batch_breakdown, headline, trend_label};
use crate::model::IterationSummary;
use crate::reports::StateReport;
use crate::util::{format_count, format_percent};
use colored::*;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// One row of the batch table, uncoloured.
fn batch_row(summary: &IterationSummary) -> [String; 6] {
    [
        summary.timestamp.format(TIMESTAMP_FORMAT).to_string(),
        format!("{} +{}", summary.leading_candidate_name, format_count(summary.vote_differential)),
        batch_breakdown(summary),
        format_percent(summary.hurdle),
        format!("{:+.2}", summary.hurdle_change * 100.0),
        trend_label(summary),
    ]
}

/// Plain-text table of a state's batches, newest first.
pub fn render_table(report: &StateReport) -> Vec<String> {
    let header = [
        "Timestamp".to_string(),
        "Lead".to_string(),
        "Batch".to_string(),
        "Hurdle".to_string(),
        "Change".to_string(),
        "Trend".to_string(),
    ];
    let rows: Vec<[String; 6]> = report.newest_first().map(batch_row).collect();

    let mut widths = [0usize; 6];
    for row in std::iter::once(&header).chain(rows.iter()) {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |row: &[String; 6]| {
        row.iter()
            .zip(widths.iter())
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![format_row(&header)];
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    lines.extend(rows.iter().map(format_row));
    lines
}

/// Print a state's headline and batch table.
pub fn print_report(report: &StateReport) {
    println!(
        "\n{} {}",
        report.state_name.bright_white().bold(),
        format!("({} electoral votes)", report.electoral_votes).dimmed()
    );

    let latest = match report.latest() {
        Some(latest) => latest,
        None => {
            println!("  {}", "no batches".dimmed());
            return;
        }
    };
    println!("  {}", headline(latest).bright_cyan());

    let table = render_table(report);
    for line in table.iter().take(2) {
        println!("  {}", line.bold());
    }
    // Rows follow the newest-first order of `render_table`.
    for (line, summary) in table.iter().skip(2).zip(report.newest_first()) {
        if summary.trailer_beat_hurdle() {
            println!("  {}", line.green());
        } else if summary.new_votes > 0 {
            println!("  {}", line.red());
        } else {
            println!("  {}", line);
        }
    }
}
