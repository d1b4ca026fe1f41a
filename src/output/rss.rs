use super::html::escape_html;
use super::{batch_breakdown, headline, trend_label, OutputResult};
use crate::model::IterationSummary;
use crate::reports::StateReport;
use crate::util::format_count;
use itertools::Itertools;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

pub const DEFAULT_ITEM_LIMIT: usize = 100;

const CHANNEL_TITLE: &str = "Battleground State Changes";

fn item_title(summary: &IterationSummary) -> String {
    format!(
        "{}: {} +{}",
        summary.state_name,
        summary.leading_candidate_name,
        format_count(summary.vote_differential)
    )
}

fn item_description(summary: &IterationSummary) -> String {
    format!(
        "{}. {}. Trend: {}.",
        headline(summary),
        batch_breakdown(summary),
        trend_label(summary)
    )
}

/// RSS 2.0 feed with one item per batch across all states, newest first.
pub fn render_rss(reports: &[StateReport], limit: usize) -> String {
    let items: Vec<&IterationSummary> = reports
        .iter()
        .flat_map(|r| r.chronological())
        .sorted_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| a.state_name.cmp(&b.state_name))
        })
        .take(limit)
        .collect();

    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<rss version=\"2.0\">\n<channel>\n");
    let _ = writeln!(out, "  <title>{}</title>", CHANNEL_TITLE);
    let _ = writeln!(
        out,
        "  <description>New vote batches and hurdles in {}</description>",
        escape_html(&reports.iter().map(|r| r.state_name.as_str()).join(", "))
    );
    if let Some(newest) = items.first() {
        let _ = writeln!(out, "  <lastBuildDate>{}</lastBuildDate>", newest.timestamp.to_rfc2822());
    }

    for summary in items {
        out.push_str("  <item>\n");
        let _ = writeln!(out, "    <title>{}</title>", escape_html(&item_title(summary)));
        let _ = writeln!(
            out,
            "    <description>{}</description>",
            escape_html(&item_description(summary))
        );
        let _ = writeln!(out, "    <pubDate>{}</pubDate>", summary.timestamp.to_rfc2822());
        let _ = writeln!(
            out,
            "    <guid isPermaLink=\"false\">{}-{}</guid>",
            escape_html(&summary.state_name.to_lowercase().replace(' ', "-")),
            summary.timestamp.timestamp()
        );
        out.push_str("  </item>\n");
    }

    out.push_str("</channel>\n</rss>\n");
    out
}

pub fn write_rss(reports: &[StateReport], path: &Path, limit: usize) -> OutputResult<()> {
    fs::write(path, render_rss(reports, limit))?;
    Ok(())
}
