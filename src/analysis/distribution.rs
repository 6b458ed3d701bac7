//! How often each sign appears across a row set

use serde::Serialize;

use crate::common::types::{ComputedMatch, OutcomeMap, Row};

/// Sign counts for one match
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchDistribution {
    pub match_id: String,
    pub counts: OutcomeMap<usize>,
    /// Counts as percent of the row set, 0 when the set is empty
    pub percentages: OutcomeMap<f64>,
}

/// Per-match sign distribution, in match order
pub fn outcome_distribution(matches: &[ComputedMatch], rows: &[Row]) -> Vec<MatchDistribution> {
    matches
        .iter()
        .map(|m| {
            let mut counts = OutcomeMap::full(0usize, 0, 0);
            for outcome in rows.iter().filter_map(|r| r.picks.get(m.id())) {
                let current = counts.get(*outcome).unwrap_or(0);
                counts.set(*outcome, Some(current + 1));
            }
            let total = rows.len();
            let percentages = counts
                .iter()
                .map(|(o, c)| {
                    let pct = if total > 0 { c as f64 / total as f64 * 100.0 } else { 0.0 };
                    (o, pct)
                })
                .collect();
            MatchDistribution {
                match_id: m.id().to_string(),
                counts,
                percentages,
            }
        })
        .collect()
}
