pub mod console;
pub mod csv;
pub mod html;
pub mod json;
pub mod rss;

use crate::model::IterationSummary;
use crate::util::{format_count, format_percent};
use std::io;

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),
}

pub type OutputResult<T> = std::result::Result<T, OutputError>;

pub const OUTPUT_STEM: &str = "battleground-state-changes";

/// "Biden leads Trump by 1,234 votes; Trump needs 52.3% of the remaining 5,000 votes"
pub fn headline(summary: &IterationSummary) -> String {
    let lead = format!(
        "{} leads {} by {} votes",
        summary.leading_candidate_name,
        summary.trailing_candidate_name,
        format_count(summary.vote_differential)
    );

    if summary.votes_remaining > 0 {
        format!(
            "{}; {} needs {} of the remaining {} votes",
            lead,
            summary.trailing_candidate_name,
            format_percent(summary.hurdle),
            format_count(summary.votes_remaining)
        )
    } else {
        format!("{}; no votes remaining", lead)
    }
}

/// "1,000 new: Biden 60.0% / Trump 40.0%", or a note that nothing was added.
pub fn batch_breakdown(summary: &IterationSummary) -> String {
    if summary.new_votes == 0 {
        return "no new votes".to_string();
    }
    format!(
        "{} new: {} {} / {} {}",
        format_count(summary.new_votes),
        summary.leading_candidate_name,
        format_percent(summary.leading_candidate_partition),
        summary.trailing_candidate_name,
        format_percent(summary.trailing_candidate_partition)
    )
}

pub fn trend_label(summary: &IterationSummary) -> String {
    summary
        .hurdle_mov_avg
        .map(format_percent)
        .unwrap_or_else(|| "n/a".to_string())
}
