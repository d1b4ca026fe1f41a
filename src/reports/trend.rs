// Volume-windowed trend of the trailing candidate's share of recent batches.

use crate::model::IterationSummary;

/// Number of most recent votes the trend is averaged over.
pub const DEFAULT_VOLUME_FLOOR: i64 = 30_000;

/// Estimates how the trailing candidate has been doing across the last
/// `volume_floor` newly counted votes, however many batches that spans.
#[derive(Debug, Clone, Copy)]
pub struct TrendEstimator {
    volume_floor: i64,
}

impl Default for TrendEstimator {
    fn default() -> Self {
        Self {
            volume_floor: DEFAULT_VOLUME_FLOOR,
        }
    }
}

impl TrendEstimator {
    pub fn new(volume_floor: i64) -> Self {
        Self { volume_floor }
    }

    /// Weighted average of the trailing candidate's batch shares.
    ///
    /// `history` must yield earlier summaries newest first. The newest batch
    /// always counts in full; older batches are added until the window holds
    /// `volume_floor` votes, the last one only in part. Returns `None` when
    /// there are no votes to average over.
    ///
    /// Each batch's trailing votes are rounded with `f64::round`, so halves
    /// go away from zero: a 0.5 share of 1001 votes counts as 501, not the
    /// 500 that round-half-to-even would give.
    pub fn estimate<'a, I>(
        &self,
        history: I,
        newest_votes: i64,
        newest_trailing_partition: f64,
        trailing_candidate_name: &str,
    ) -> Option<f64>
    where
        I: IntoIterator<Item = &'a IterationSummary>,
    {
        let floor = self.volume_floor as f64;
        let mut agg_votes = newest_votes as f64;
        let mut agg_trailing_votes = (newest_trailing_partition * newest_votes as f64).round();

        for batch in history {
            if agg_votes >= floor {
                break;
            }
            if batch.new_votes == 0 {
                continue;
            }

            // Only right for two-candidate races: when the trailer changed,
            // the earlier batch's leader is assumed to be today's trailer.
            let partition = if batch.trailing_candidate_name == trailing_candidate_name {
                batch.trailing_candidate_partition
            } else {
                batch.leading_candidate_partition
            };

            let batch_votes = batch.new_votes as f64;
            if agg_votes + batch_votes > floor {
                let fraction = (floor - agg_votes) / batch_votes;
                agg_votes = floor;
                agg_trailing_votes += (partition * batch_votes * fraction).round();
            } else {
                agg_votes += batch_votes;
                agg_trailing_votes += (partition * batch_votes).round();
            }
        }

        if agg_votes > 0.0 {
            Some(agg_trailing_votes / agg_votes)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn batch(minute: u32, trailer: &str, new_votes: i64, trailing_partition: f64) -> IterationSummary {
        IterationSummary {
            timestamp: Utc.with_ymd_and_hms(2020, 11, 5, 12, minute, 0).unwrap(),
            state_name: "Georgia".to_string(),
            leading_candidate_name: if trailer == "Biden" { "Trump" } else { "Biden" }.to_string(),
            trailing_candidate_name: trailer.to_string(),
            leading_candidate_votes: 0,
            trailing_candidate_votes: 0,
            vote_differential: 0,
            votes_remaining: 0,
            new_votes,
            leading_candidate_partition: if new_votes == 0 { 0.0 } else { 1.0 - trailing_partition },
            trailing_candidate_partition: trailing_partition,
            precincts_reporting: 0,
            precincts_total: 0,
            hurdle: 0.0,
            hurdle_change: 0.0,
            hurdle_mov_avg: None,
        }
    }

    #[test]
    fn no_votes_gives_no_trend() {
        let estimator = TrendEstimator::default();
        let history: Vec<IterationSummary> = Vec::new();
        assert_eq!(estimator.estimate(&history, 0, 0.0, "Biden"), None);
    }

    #[test]
    fn aggregates_exactly_three_ten_thousand_vote_batches() {
        let estimator = TrendEstimator::default();
        // Newest first.
        let history = vec![
            batch(3, "Biden", 10_000, 0.5),
            batch(2, "Biden", 10_000, 0.4),
            batch(1, "Biden", 10_000, 0.1),
        ];

        let trend = estimator.estimate(&history, 10_000, 0.6, "Biden").unwrap();
        assert!((trend - 0.5).abs() < 1e-12, "trend was {}", trend);
    }

    #[test]
    fn large_newest_batch_is_used_alone() {
        let estimator = TrendEstimator::default();
        let history = vec![batch(1, "Biden", 10_000, 0.1)];

        let trend = estimator.estimate(&history, 50_000, 0.62, "Biden").unwrap();
        assert!((trend - 0.62).abs() < 1e-12);
    }

    #[test]
    fn overshooting_batch_is_sliced_to_the_floor() {
        let estimator = TrendEstimator::default();
        let history = vec![batch(2, "Biden", 40_000, 0.25), batch(1, "Biden", 10_000, 0.9)];

        // 10k at 0.5 plus 20k of the 40k batch at 0.25.
        let trend = estimator.estimate(&history, 10_000, 0.5, "Biden").unwrap();
        assert!((trend - 10_000.0 / 30_000.0).abs() < 1e-12);
    }

    #[test]
    fn zero_vote_batches_are_skipped() {
        let estimator = TrendEstimator::default();
        let history = vec![batch(2, "Biden", 0, 0.0), batch(1, "Biden", 1_000, 0.8)];

        let trend = estimator.estimate(&history, 1_000, 0.6, "Biden").unwrap();
        assert!((trend - 0.7).abs() < 1e-12);
    }

    #[test]
    fn mismatched_trailer_falls_back_to_leading_partition() {
        let estimator = TrendEstimator::default();
        // Earlier batch was reported with Trump trailing; Biden led it with 0.7.
        let history = vec![batch(1, "Trump", 1_000, 0.3)];

        let trend = estimator.estimate(&history, 1_000, 0.5, "Biden").unwrap();
        assert!((trend - 0.6).abs() < 1e-12, "leading partition should be used, got {}", trend);
    }

    #[test]
    fn custom_floor_limits_the_window() {
        let estimator = TrendEstimator::new(2_000);
        let history = vec![batch(2, "Biden", 1_000, 0.2), batch(1, "Biden", 1_000, 1.0)];

        let trend = estimator.estimate(&history, 1_000, 0.6, "Biden").unwrap();
        assert!((trend - 0.4).abs() < 1e-12);
    }

    #[test]
    fn half_votes_round_away_from_zero() {
        let estimator = TrendEstimator::default();
        let history: Vec<IterationSummary> = Vec::new();

        let trend = estimator.estimate(&history, 1_001, 0.5, "Biden").unwrap();
        assert_eq!(trend, 501.0 / 1_001.0);
    }
}
