//! Core data model shared by every stage of the pipeline

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::PoolError;

/// Match outcome sign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "1")]
    Home,
    #[serde(rename = "X", alias = "x")]
    Draw,
    #[serde(rename = "2")]
    Away,
}

impl Outcome {
    /// Canonical order: 1, X, 2
    pub const ALL: [Outcome; 3] = [Outcome::Home, Outcome::Draw, Outcome::Away];

    /// Coupon sign for this outcome
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Home => "1",
            Outcome::Draw => "X",
            Outcome::Away => "2",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Outcome {
    type Err = PoolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Outcome::Home),
            "X" | "x" => Ok(Outcome::Draw),
            "2" => Ok(Outcome::Away),
            other => Err(PoolError::InvalidOutcome(other.to_string())),
        }
    }
}

/// Partial per-outcome values (odds, shares, probabilities)
///
/// Serialized as `{"1": .., "X": .., "2": ..}` with absent outcomes omitted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OutcomeMap<T> {
    #[serde(rename = "1", default, skip_serializing_if = "Option::is_none")]
    pub home: Option<T>,
    #[serde(rename = "X", alias = "x", default, skip_serializing_if = "Option::is_none")]
    pub draw: Option<T>,
    #[serde(rename = "2", default, skip_serializing_if = "Option::is_none")]
    pub away: Option<T>,
}

impl<T: Copy> OutcomeMap<T> {
    /// Create a map with all three outcomes present
    pub fn full(home: T, draw: T, away: T) -> Self {
        Self {
            home: Some(home),
            draw: Some(draw),
            away: Some(away),
        }
    }

    /// Value for an outcome, if present
    pub fn get(&self, outcome: Outcome) -> Option<T> {
        match outcome {
            Outcome::Home => self.home,
            Outcome::Draw => self.draw,
            Outcome::Away => self.away,
        }
    }

    /// Set or clear the value for an outcome
    pub fn set(&mut self, outcome: Outcome, value: Option<T>) {
        match outcome {
            Outcome::Home => self.home = value,
            Outcome::Draw => self.draw = value,
            Outcome::Away => self.away = value,
        }
    }

    /// Present entries in canonical outcome order
    pub fn iter(&self) -> impl Iterator<Item = (Outcome, T)> + '_ {
        Outcome::ALL
            .into_iter()
            .filter_map(move |outcome| self.get(outcome).map(|v| (outcome, v)))
    }

    /// Outcomes with no value
    pub fn missing(&self) -> Vec<Outcome> {
        Outcome::ALL
            .into_iter()
            .filter(|o| self.get(*o).is_none())
            .collect()
    }

    /// Number of present entries
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// True if no outcome has a value
    pub fn is_empty(&self) -> bool {
        self.home.is_none() && self.draw.is_none() && self.away.is_none()
    }
}

impl<T: Copy> FromIterator<(Outcome, T)> for OutcomeMap<T> {
    fn from_iter<I: IntoIterator<Item = (Outcome, T)>>(iter: I) -> Self {
        let mut map = OutcomeMap {
            home: None,
            draw: None,
            away: None,
        };
        for (outcome, value) in iter {
            map.set(outcome, Some(value));
        }
        map
    }
}

/// One match on the coupon as supplied by the coupon source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Unique, stable identifier
    pub id: String,
    /// Home team name
    pub home: String,
    /// Away team name
    pub away: String,
    /// Primary decimal odds
    #[serde(default)]
    pub odds: OutcomeMap<f64>,
    /// Share of the betting public on each outcome, 0..=1
    #[serde(default, alias = "streck")]
    pub public_share: OutcomeMap<f64>,
    /// Secondary odds used when the primary source lacks a value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_odds: Option<OutcomeMap<f64>>,
}

impl Match {
    pub fn new(id: impl Into<String>, home: impl Into<String>, away: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            home: home.into(),
            away: away.into(),
            odds: OutcomeMap::default(),
            public_share: OutcomeMap::default(),
            fallback_odds: None,
        }
    }

    pub fn with_odds(mut self, home: f64, draw: f64, away: f64) -> Self {
        self.odds = OutcomeMap::full(home, draw, away);
        self
    }

    pub fn with_shares(mut self, home: f64, draw: f64, away: f64) -> Self {
        self.public_share = OutcomeMap::full(home, draw, away);
        self
    }

    pub fn with_fallback_odds(mut self, home: f64, draw: f64, away: f64) -> Self {
        self.fallback_odds = Some(OutcomeMap::full(home, draw, away));
        self
    }
}

/// A match with derived probabilities and differentials
///
/// Built fresh from a [`Match`] each time its inputs change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComputedMatch {
    #[serde(flatten)]
    pub source: Match,
    /// Normalized implied probability; empty when nothing was usable
    pub probability: OutcomeMap<f64>,
    /// probability - public share, only where both exist
    pub differential: OutcomeMap<f64>,
}

impl ComputedMatch {
    pub fn id(&self) -> &str {
        &self.source.id
    }

    pub fn probability(&self, outcome: Outcome) -> Option<f64> {
        self.probability.get(outcome)
    }

    pub fn share(&self, outcome: Outcome) -> Option<f64> {
        self.source.public_share.get(outcome)
    }
}

/// Payout fields attached once a pool size is known
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RowPayout {
    /// Expected cash return minus the unit stake
    pub monetary_ev: f64,
    /// Expected payout per winner if this row comes in
    pub expected_payout_on_win: f64,
    /// Raw expected number of co-winning tickets
    pub expected_winners: f64,
}

/// One candidate ticket: a sign for every match plus its scores
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    /// Match id -> chosen outcome, sorted by id
    pub picks: BTreeMap<String, Outcome>,
    pub joint_probability: f64,
    pub joint_share: f64,
    pub value_index: f64,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub payout: Option<RowPayout>,
}

impl Row {
    /// Copy of this row with payout fields attached
    pub fn with_payout(&self, payout: RowPayout) -> Row {
        Row {
            payout: Some(payout),
            ..self.clone()
        }
    }

    pub fn monetary_ev(&self) -> Option<f64> {
        self.payout.map(|p| p.monetary_ev)
    }

    pub fn expected_payout_on_win(&self) -> Option<f64> {
        self.payout.map(|p| p.expected_payout_on_win)
    }

    /// Signs in the given match order, e.g. "1X2"
    pub fn signs(&self, match_order: &[ComputedMatch]) -> String {
        match_order
            .iter()
            .filter_map(|m| self.picks.get(m.id()))
            .map(|o| o.as_str())
            .collect()
    }
}
