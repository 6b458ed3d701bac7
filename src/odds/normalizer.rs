//! Odds to implied probability conversion

use crate::common::types::{Match, Outcome, OutcomeMap};

/// Where an outcome's price came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSource {
    Primary,
    Fallback,
    /// Public share treated as fair odds of 1/share
    PublicShare,
}

/// Usable decimal odds: finite and strictly positive
fn usable(odds: Option<f64>) -> Option<f64> {
    odds.filter(|o| o.is_finite() && *o > 0.0)
}

/// Raw implied probability of a decimal price, 0 when unusable
pub fn odds_to_raw_probability(odds: f64) -> f64 {
    if !odds.is_finite() || odds <= 0.0 {
        return 0.0;
    }
    1.0 / odds
}

/// Pick the odds for one outcome
///
/// Primary odds win, then fallback odds, then the public share read as fair
/// odds. Returns `None` when no source has a usable value.
pub fn resolve_odds(m: &Match, outcome: Outcome) -> Option<(f64, PriceSource)> {
    if let Some(odds) = usable(m.odds.get(outcome)) {
        return Some((odds, PriceSource::Primary));
    }
    if let Some(odds) = usable(m.fallback_odds.and_then(|f| f.get(outcome))) {
        return Some((odds, PriceSource::Fallback));
    }
    m.public_share
        .get(outcome)
        .filter(|s| s.is_finite() && *s > 0.0)
        .map(|s| (1.0 / s, PriceSource::PublicShare))
}

/// Scale present values so they sum to 1.0
///
/// A map whose values sum to zero is returned unchanged.
pub fn normalize(raw: &OutcomeMap<f64>) -> OutcomeMap<f64> {
    let sum: f64 = raw.iter().map(|(_, v)| v).sum();
    if sum <= 0.0 || !sum.is_finite() {
        return *raw;
    }
    raw.iter().map(|(o, v)| (o, v / sum)).collect()
}

/// Normalized implied probabilities for a match
///
/// Empty when no outcome has odds from any source.
pub fn implied_probabilities(m: &Match) -> OutcomeMap<f64> {
    let raw: OutcomeMap<f64> = Outcome::ALL
        .into_iter()
        .filter_map(|o| resolve_odds(m, o).map(|(odds, _)| (o, odds_to_raw_probability(odds))))
        .collect();
    normalize(&raw)
}
