//! Odds-lookup collaborator seam
//!
//! Remote odds providers return replacement odds for some of the matches on
//! a coupon. Matches they do not cover keep their own odds and fall back as
//! usual during normalization.

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::common::errors::Result;
use crate::common::types::{Match, OutcomeMap};

/// Provider of replacement odds, keyed by match id
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OddsLookup: Send + Sync {
    /// Name of the provider
    fn source_name(&self) -> &'static str;

    /// Odds for as many of `matches` as the provider can price
    async fn lookup(&self, matches: &[Match]) -> Result<HashMap<String, OutcomeMap<f64>>>;
}

/// Fixed odds table, useful for manual overrides and tests
#[derive(Debug, Clone, Default)]
pub struct InMemoryOddsLookup {
    odds: HashMap<String, OutcomeMap<f64>>,
}

impl InMemoryOddsLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update or insert odds for a match
    pub fn set_odds(&mut self, match_id: impl Into<String>, odds: OutcomeMap<f64>) {
        self.odds.insert(match_id.into(), odds);
    }

    pub fn len(&self) -> usize {
        self.odds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.odds.is_empty()
    }
}

#[async_trait]
impl OddsLookup for InMemoryOddsLookup {
    fn source_name(&self) -> &'static str {
        "in_memory"
    }

    async fn lookup(&self, matches: &[Match]) -> Result<HashMap<String, OutcomeMap<f64>>> {
        Ok(matches
            .iter()
            .filter_map(|m| self.odds.get(&m.id).map(|o| (m.id.clone(), *o)))
            .collect())
    }
}

/// New match list with looked-up odds as primary odds
///
/// Replacements without any usable value are ignored; uncovered matches are
/// returned unchanged.
pub async fn apply_lookup(lookup: &dyn OddsLookup, matches: &[Match]) -> Result<Vec<Match>> {
    let found = lookup.lookup(matches).await?;

    let mut replaced = 0;
    let updated: Vec<Match> = matches
        .iter()
        .map(|m| match found.get(&m.id) {
            Some(odds) if odds.iter().any(|(_, v)| v.is_finite() && v > 0.0) => {
                replaced += 1;
                Match {
                    odds: *odds,
                    ..m.clone()
                }
            }
            _ => m.clone(),
        })
        .collect();

    if replaced < matches.len() {
        debug!(
            source = lookup.source_name(),
            missing = matches.len() - replaced,
            "lookup left some matches uncovered"
        );
    }
    info!(source = lookup.source_name(), replaced, total = matches.len(), "odds lookup applied");
    Ok(updated)
}
