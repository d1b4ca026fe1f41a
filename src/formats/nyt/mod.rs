//! Reader for the results document published on election night: one JSON
//! file per version, with a `data.races` array holding one race per state.

use crate::model::{Candidate, Snapshot};
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ResultsDocument {
    data: ResultsData,
}

#[derive(Debug, Deserialize)]
struct ResultsData {
    races: Vec<Race>,
}

#[derive(Debug, Deserialize)]
struct Race {
    state_name: String,
    electoral_votes: u32,
    candidates: Vec<RaceCandidate>,
    votes: i64,
    #[serde(default)]
    tot_exp_vote: i64,
    precincts_total: i64,
    precincts_reporting: i64,
    #[serde(default)]
    counties: Vec<County>,
}

#[derive(Debug, Deserialize)]
struct RaceCandidate {
    last_name: String,
    votes: i64,
}

#[derive(Debug, Deserialize)]
struct County {
    #[serde(default)]
    tot_exp_vote: i64,
}

impl Race {
    /// Turnout expectation, summed over counties when the race lists them.
    fn expected_votes(&self) -> i64 {
        if self.counties.is_empty() {
            self.tot_exp_vote
        } else {
            self.counties.iter().map(|c| c.tot_exp_vote).sum()
        }
    }

    fn into_snapshot(self, timestamp: DateTime<Utc>) -> Snapshot {
        let expected_votes = self.expected_votes();
        Snapshot {
            timestamp,
            state_name: self.state_name,
            electoral_votes: self.electoral_votes,
            candidates: self
                .candidates
                .into_iter()
                .map(|c| Candidate::new(c.last_name, c.votes))
                .collect(),
            votes: self.votes,
            expected_votes,
            precincts_total: self.precincts_total,
            precincts_reporting: self.precincts_reporting,
        }
    }
}

/// Parse one document version into a snapshot per race, all stamped with
/// the version's timestamp.
pub fn parse_results(content: &[u8], timestamp: DateTime<Utc>) -> serde_json::Result<Vec<Snapshot>> {
    let document: ResultsDocument = serde_json::from_slice(content)?;
    Ok(document
        .data
        .races
        .into_iter()
        .map(|race| race.into_snapshot(timestamp))
        .collect())
}
