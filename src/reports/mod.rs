use crate::formats::{FormatError, SnapshotSource};
use crate::model::IterationSummary;
use chrono::{DateTime, Utc};
use colored::*;

pub mod generator;
pub mod trend;

use generator::summarize_state;
use trend::{TrendEstimator, DEFAULT_VOLUME_FLOOR};

#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    #[error("{state} snapshot at {timestamp} has {found} candidate(s), need at least two")]
    MissingCandidates {
        state: String,
        timestamp: DateTime<Utc>,
        found: usize,
    },
    #[error("{state} snapshot at {current} is not later than the previous batch at {previous}")]
    OutOfOrder {
        state: String,
        previous: DateTime<Utc>,
        current: DateTime<Utc>,
    },
    #[error("snapshot for {found} fed to the {expected} summarizer")]
    StateMismatch { expected: String, found: String },
}

pub type SummaryResult<T> = std::result::Result<T, SummaryError>;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Summary error: {0}")]
    Summary(#[from] SummaryError),
    #[error("Snapshot error: {0}")]
    Format(#[from] FormatError),
}

pub type ReportResult<T> = std::result::Result<T, ReportError>;

/// States followed when no explicit selection is given.
pub const BATTLEGROUND_STATES: &[&str] = &[
    "Alaska",
    "Arizona",
    "Georgia",
    "Nevada",
    "North Carolina",
    "Pennsylvania",
];

/// Which states to summarize and how.
#[derive(Debug, Clone)]
pub struct SummaryOptions {
    /// Explicit state list; `None` means every state the source knows.
    pub states: Option<Vec<String>>,
    pub volume_floor: i64,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            states: Some(BATTLEGROUND_STATES.iter().map(|s| s.to_string()).collect()),
            volume_floor: DEFAULT_VOLUME_FLOOR,
        }
    }
}

/// All batch summaries derived for one state.
///
/// Summaries are stored in processing (chronological) order.
#[derive(Debug, Clone)]
pub struct StateReport {
    pub state_name: String,
    pub electoral_votes: u32,
    pub(crate) summaries: Vec<IterationSummary>,
}

impl StateReport {
    pub fn chronological(&self) -> &[IterationSummary] {
        &self.summaries
    }

    pub fn newest_first(&self) -> impl Iterator<Item = &IterationSummary> + '_ {
        self.summaries.iter().rev()
    }

    pub fn latest(&self) -> Option<&IterationSummary> {
        self.summaries.last()
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }
}

/// Summarize every selected state available from `source`.
///
/// States are reduced independently; reports come back in selection order.
pub fn summarize_source(
    source: &dyn SnapshotSource,
    options: &SummaryOptions,
) -> ReportResult<Vec<StateReport>> {
    let estimator = TrendEstimator::new(options.volume_floor);
    let available = source.states()?;

    let states = match &options.states {
        Some(states) => states.clone(),
        None => available.clone(),
    };

    let mut reports = Vec::new();
    for state in states {
        if !available.contains(&state) {
            eprintln!("⚠️  No snapshots found for {}", state.yellow());
            continue;
        }

        let snapshots = source.load_snapshots(&state)?;
        let report = summarize_state(&state, &snapshots, estimator)?;

        println!(
            "  📊 {}: {} snapshots, {} batches",
            state.bright_cyan(),
            snapshots.len(),
            report.len().to_string().bright_yellow()
        );

        reports.push(report);
    }

    Ok(reports)
}
