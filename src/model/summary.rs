use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// State carried from one accepted snapshot to the next.
///
/// Two consecutive snapshots whose `IterationInfo` compare equal are treated
/// as the same observation; only these five fields take part in the check.
#[derive(Debug, Clone)]
pub struct IterationInfo {
    pub vote_diff: i64,
    pub votes: i64,
    pub precincts_reporting: i64,
    pub hurdle: f64,
    pub leading_candidate_name: String,
}

impl PartialEq for IterationInfo {
    fn eq(&self, other: &Self) -> bool {
        self.vote_diff == other.vote_diff
            && self.votes == other.votes
            && self.precincts_reporting == other.precincts_reporting
            && self.hurdle == other.hurdle
            && self.leading_candidate_name == other.leading_candidate_name
    }
}

/// Derived, user-facing description of one batch of newly counted votes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationSummary {
    pub timestamp: DateTime<Utc>,
    pub state_name: String,
    pub leading_candidate_name: String,
    pub trailing_candidate_name: String,
    pub leading_candidate_votes: i64,
    pub trailing_candidate_votes: i64,
    pub vote_differential: i64,
    pub votes_remaining: i64,
    pub new_votes: i64,
    /// Leader's estimated share of `new_votes`; 0 when nothing new was counted.
    pub leading_candidate_partition: f64,
    /// Trailer's estimated share of `new_votes`; 0 when nothing new was counted.
    pub trailing_candidate_partition: f64,
    pub precincts_reporting: i64,
    pub precincts_total: i64,
    pub hurdle: f64,
    pub hurdle_change: f64,
    pub hurdle_mov_avg: Option<f64>,
}

impl IterationSummary {
    /// True when the trailer took a larger share of this batch than it needs
    /// of the remaining votes.
    pub fn trailer_beat_hurdle(&self) -> bool {
        self.new_votes > 0 && self.votes_remaining > 0 && self.trailing_candidate_partition > self.hurdle
    }
}
