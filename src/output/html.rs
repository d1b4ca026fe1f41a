use super::{batch_breakdown, headline, trend_label, OutputResult};
use crate::model::IterationSummary;
use crate::reports::StateReport;
use crate::util::{format_count, format_percent};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn batch_row(out: &mut String, summary: &IterationSummary) {
    let class = if summary.trailer_beat_hurdle() {
        " class=\"trailer-gaining\""
    } else {
        ""
    };
    let cells = [
        summary.timestamp.format("%Y-%m-%d %H:%M UTC").to_string(),
        format!(
            "{} +{}",
            summary.leading_candidate_name,
            format_count(summary.vote_differential)
        ),
        batch_breakdown(summary),
        format_percent(summary.hurdle),
        format!("{:+.2}", summary.hurdle_change * 100.0),
        trend_label(summary),
    ];

    let _ = write!(out, "      <tr{}>", class);
    for cell in &cells {
        let _ = write!(out, "<td>{}</td>", escape_html(cell));
    }
    out.push_str("</tr>\n");
}

fn state_section(out: &mut String, report: &StateReport) {
    let _ = writeln!(
        out,
        "  <section id=\"{}\">\n    <h2>{} ({} electoral votes)</h2>",
        escape_html(&report.state_name.to_lowercase().replace(' ', "-")),
        escape_html(&report.state_name),
        report.electoral_votes
    );
    if let Some(latest) = report.latest() {
        let _ = writeln!(out, "    <p>{}</p>", escape_html(&headline(latest)));
    }
    out.push_str("    <table>\n      <tr><th>Timestamp</th><th>Lead</th><th>Batch</th><th>Hurdle</th><th>Change</th><th>Trend</th></tr>\n");
    for summary in report.newest_first() {
        batch_row(out, summary);
    }
    out.push_str("    </table>\n  </section>\n");
}

/// Standalone page with one section per state.
pub fn render_html(reports: &[StateReport]) -> String {
    let mut out = String::from(
        "<!DOCTYPE html>\n<html>\n<head>\n  <meta charset=\"utf-8\">\n  <title>Battleground State Changes</title>\n</head>\n<body>\n  <h1>Battleground State Changes</h1>\n",
    );
    for report in reports {
        state_section(&mut out, report);
    }
    out.push_str("</body>\n</html>\n");
    out
}

pub fn write_html(reports: &[StateReport], path: &Path) -> OutputResult<()> {
    fs::write(path, render_html(reports))?;
    Ok(())
}
