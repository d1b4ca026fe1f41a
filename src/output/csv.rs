use super::OutputResult;
use crate::model::IterationSummary;
use crate::reports::StateReport;
use std::fs;
use std::path::Path;

const HEADER: &[&str] = &[
    "state",
    "timestamp",
    "leading_candidate_name",
    "trailing_candidate_name",
    "leading_candidate_votes",
    "trailing_candidate_votes",
    "vote_differential",
    "votes_remaining",
    "new_votes",
    "leading_candidate_partition",
    "trailing_candidate_partition",
    "precincts_reporting",
    "precincts_total",
    "hurdle",
    "hurdle_change",
    "hurdle_mov_avg",
];

fn escape(field: &str) -> String {
    if field.contains(|c: char| c == ',' || c == '"' || c == '\n' || c == '\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn record(summary: &IterationSummary) -> Vec<String> {
    vec![
        summary.state_name.clone(),
        summary.timestamp.to_rfc3339(),
        summary.leading_candidate_name.clone(),
        summary.trailing_candidate_name.clone(),
        summary.leading_candidate_votes.to_string(),
        summary.trailing_candidate_votes.to_string(),
        summary.vote_differential.to_string(),
        summary.votes_remaining.to_string(),
        summary.new_votes.to_string(),
        summary.leading_candidate_partition.to_string(),
        summary.trailing_candidate_partition.to_string(),
        summary.precincts_reporting.to_string(),
        summary.precincts_total.to_string(),
        summary.hurdle.to_string(),
        summary.hurdle_change.to_string(),
        summary
            .hurdle_mov_avg
            .map(|v| v.to_string())
            .unwrap_or_default(),
    ]
}

/// Every summary of every state, chronological within a state.
pub fn render_csv(reports: &[StateReport]) -> String {
    let mut out = HEADER.join(",");
    out.push_str("\r\n");

    for summary in reports.iter().flat_map(|r| r.chronological()) {
        let line: Vec<String> = record(summary).iter().map(|f| escape(f)).collect();
        out.push_str(&line.join(","));
        out.push_str("\r\n");
    }
    out
}

pub fn write_csv(reports: &[StateReport], path: &Path) -> OutputResult<()> {
    fs::write(path, render_csv(reports))?;
    Ok(())
}
