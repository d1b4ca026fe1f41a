use super::trend::TrendEstimator;
use super::{StateReport, SummaryError, SummaryResult};
use crate::model::{IterationInfo, IterationSummary, Snapshot};
use chrono::{DateTime, Utc};

/// Folds one state's snapshots, oldest first, into batch summaries.
pub struct StateSummarizer {
    state_name: String,
    estimator: TrendEstimator,
    electoral_votes: u32,
    last_info: Option<IterationInfo>,
    last_timestamp: Option<DateTime<Utc>>,
    summaries: Vec<IterationSummary>,
}

impl StateSummarizer {
    pub fn new(state_name: &str, estimator: TrendEstimator) -> Self {
        Self {
            state_name: state_name.to_string(),
            estimator,
            electoral_votes: 0,
            last_info: None,
            last_timestamp: None,
            summaries: Vec::new(),
        }
    }

    /// Feed the next snapshot. Returns the new summary, or `None` when the
    /// snapshot changed nothing observable since the last accepted one.
    pub fn push(&mut self, snapshot: &Snapshot) -> SummaryResult<Option<&IterationSummary>> {
        if snapshot.state_name != self.state_name {
            return Err(SummaryError::StateMismatch {
                expected: self.state_name.clone(),
                found: snapshot.state_name.clone(),
            });
        }

        let (leader, trailer) = match (snapshot.leader(), snapshot.trailer()) {
            (Some(leader), Some(trailer)) => (leader, trailer),
            _ => {
                return Err(SummaryError::MissingCandidates {
                    state: snapshot.state_name.clone(),
                    timestamp: snapshot.timestamp,
                    found: snapshot.candidates.len(),
                })
            }
        };

        let previous = self.last_info.as_ref();

        let vote_diff = leader.votes - trailer.votes;
        let votes_remaining = snapshot.expected_votes - snapshot.votes;
        let new_votes = previous.map_or(0, |p| snapshot.votes - p.votes);
        let bumped = previous.map_or(false, |p| p.leading_candidate_name != leader.name);

        let hurdle = compute_hurdle(
            vote_diff,
            votes_remaining,
            leader.votes + trailer.votes,
            snapshot.votes,
        );

        let (leading_partition, trailing_partition) = match previous {
            Some(previous) if new_votes != 0 => {
                let sign = if bumped { -1 } else { 1 };
                let last_diff = sign * previous.vote_diff;
                let repartition =
                    ((new_votes + (last_diff - vote_diff)) as f64 / 2.0) / new_votes as f64;
                (1.0 - repartition, repartition)
            }
            _ => (0.0, 0.0),
        };

        let baseline = match previous {
            Some(previous) if bumped => 1.0 - previous.hurdle,
            Some(previous) => previous.hurdle,
            None => 0.0,
        };
        let hurdle_change = hurdle - baseline;

        let info = IterationInfo {
            vote_diff,
            votes: snapshot.votes,
            precincts_reporting: snapshot.precincts_reporting,
            hurdle,
            leading_candidate_name: leader.name.clone(),
        };

        if previous == Some(&info) {
            return Ok(None);
        }

        if let Some(last_timestamp) = self.last_timestamp {
            if snapshot.timestamp <= last_timestamp {
                return Err(SummaryError::OutOfOrder {
                    state: self.state_name.clone(),
                    previous: last_timestamp,
                    current: snapshot.timestamp,
                });
            }
        }

        let hurdle_mov_avg = self.estimator.estimate(
            self.summaries.iter().rev(),
            new_votes,
            trailing_partition,
            &trailer.name,
        );

        self.summaries.push(IterationSummary {
            timestamp: snapshot.timestamp,
            state_name: snapshot.state_name.clone(),
            leading_candidate_name: leader.name.clone(),
            trailing_candidate_name: trailer.name.clone(),
            leading_candidate_votes: leader.votes,
            trailing_candidate_votes: trailer.votes,
            vote_differential: vote_diff,
            votes_remaining,
            new_votes,
            leading_candidate_partition: leading_partition,
            trailing_candidate_partition: trailing_partition,
            precincts_reporting: snapshot.precincts_reporting,
            precincts_total: snapshot.precincts_total,
            hurdle,
            hurdle_change,
            hurdle_mov_avg,
        });
        self.electoral_votes = snapshot.electoral_votes;
        self.last_info = Some(info);
        self.last_timestamp = Some(snapshot.timestamp);

        Ok(self.summaries.last())
    }

    pub fn finish(self) -> StateReport {
        StateReport {
            state_name: self.state_name,
            electoral_votes: self.electoral_votes,
            summaries: self.summaries,
        }
    }
}

/// Share of the remaining votes the trailer needs to draw level, assuming
/// the two candidates keep their combined share of the vote. Zero when no
/// votes remain.
pub fn compute_hurdle(
    vote_diff: i64,
    votes_remaining: i64,
    candidate_votes: i64,
    total_votes: i64,
) -> f64 {
    if votes_remaining <= 0 {
        return 0.0;
    }

    let candidate_share = if total_votes > 0 {
        candidate_votes as f64 / total_votes as f64
    } else {
        0.0
    };

    (vote_diff as f64 + votes_remaining as f64 * candidate_share) / (2.0 * votes_remaining as f64)
}

/// Summarize one state's full snapshot history.
pub fn summarize_state(
    state_name: &str,
    snapshots: &[Snapshot],
    estimator: TrendEstimator,
) -> SummaryResult<StateReport> {
    let mut summarizer = StateSummarizer::new(state_name, estimator);
    for snapshot in snapshots {
        summarizer.push(snapshot)?;
    }
    Ok(summarizer.finish())
}
