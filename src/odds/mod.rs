//! Per-match derived values
//!
//! - [`normalizer`]: odds (with fallbacks) to normalized implied probability
//! - [`differential`]: implied probability minus public share

pub mod differential;
pub mod normalizer;

use tracing::debug;

use crate::common::errors::Advisory;
use crate::common::types::{ComputedMatch, Match, OutcomeMap};

pub use differential::differentials;
pub use normalizer::{implied_probabilities, normalize, resolve_odds, PriceSource};

/// Derive probabilities and differentials for one match
pub fn compute_match(m: &Match) -> ComputedMatch {
    let probability = implied_probabilities(m);
    let differential = differentials(&probability, &m.public_share);
    ComputedMatch {
        source: m.clone(),
        probability,
        differential,
    }
}

/// Derive every match, preserving input order
pub fn compute_all(matches: &[Match]) -> Vec<ComputedMatch> {
    matches.iter().map(compute_match).collect()
}

/// Advisories for outcomes that ended up without a probability
pub fn missing_data(matches: &[ComputedMatch]) -> Vec<Advisory> {
    matches
        .iter()
        .filter_map(|m| {
            let outcomes = m.probability.missing();
            if outcomes.is_empty() {
                return None;
            }
            debug!(match_id = %m.id(), ?outcomes, "match lacks implied probability");
            Some(Advisory::MissingData {
                match_id: m.id().to_string(),
                outcomes,
            })
        })
        .collect()
}

/// Advisories for odds at or below 1.0 and shares outside 0..=1
///
/// Odds that are zero, negative or not finite are already treated as absent
/// and are not reported here. Shares given in percent (e.g. `48`) show up
/// as out of range.
pub fn out_of_range(matches: &[ComputedMatch]) -> Vec<Advisory> {
    let mut advisories = Vec::new();
    for m in matches {
        let source = &m.source;
        let mut check = |field: &'static str, values: &OutcomeMap<f64>, ok: fn(f64) -> bool| {
            for (outcome, value) in values.iter() {
                if !ok(value) {
                    debug!(match_id = %source.id, field, %outcome, value, "value out of range");
                    advisories.push(Advisory::OutOfRange {
                        match_id: source.id.clone(),
                        field,
                        outcome,
                        value,
                    });
                }
            }
        };
        check("odds", &source.odds, plausible_odds);
        if let Some(fallback) = &source.fallback_odds {
            check("fallback_odds", fallback, plausible_odds);
        }
        check("public_share", &source.public_share, plausible_share);
    }
    advisories
}

fn plausible_odds(odds: f64) -> bool {
    !(odds.is_finite() && odds > 0.0 && odds <= 1.0)
}

fn plausible_share(share: f64) -> bool {
    (0.0..=1.0).contains(&share)
}
