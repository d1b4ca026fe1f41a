use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A candidate's cumulative standing within one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub votes: i64,
}

impl Candidate {
    pub fn new(name: impl Into<String>, votes: i64) -> Candidate {
        Candidate {
            name: name.into(),
            votes,
        }
    }
}

/// One observation of a state's race, taken from a single version of the
/// results document.
///
/// Candidates are kept in document order; index 0 is treated as the leader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: DateTime<Utc>,
    pub state_name: String,
    pub electoral_votes: u32,
    pub candidates: Vec<Candidate>,
    pub votes: i64,
    pub expected_votes: i64,
    pub precincts_total: i64,
    pub precincts_reporting: i64,
}

impl Snapshot {
    pub fn leader(&self) -> Option<&Candidate> {
        self.candidates.get(0)
    }

    pub fn trailer(&self) -> Option<&Candidate> {
        self.candidates.get(1)
    }
}
