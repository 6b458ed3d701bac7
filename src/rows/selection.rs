//! Per-match covers chosen by the user

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::common::errors::{Advisory, PoolError, Result};
use crate::common::types::{ComputedMatch, Outcome};

/// Match id -> covered outcomes
///
/// Each cover keeps insertion order and never holds the same outcome twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, Vec<Outcome>>",
    into = "BTreeMap<String, Vec<Outcome>>"
)]
pub struct SelectionSet {
    covers: BTreeMap<String, Vec<Outcome>>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every outcome that has both a probability and a public share
    ///
    /// A match without such an outcome gets an empty cover.
    pub fn full_cover(matches: &[ComputedMatch]) -> Self {
        let mut set = Self::new();
        for m in matches {
            let outcomes = Outcome::ALL
                .into_iter()
                .filter(|o| m.probability(*o).is_some() && m.share(*o).is_some());
            set.insert(m.id(), outcomes);
        }
        set
    }

    /// Replace the cover for a match
    pub fn insert(&mut self, match_id: impl Into<String>, outcomes: impl IntoIterator<Item = Outcome>) {
        let mut cover = Vec::with_capacity(3);
        for outcome in outcomes {
            if !cover.contains(&outcome) {
                cover.push(outcome);
            }
        }
        self.covers.insert(match_id.into(), cover);
    }

    /// Add the outcome if absent, remove it if present
    pub fn toggle(&mut self, match_id: &str, outcome: Outcome) {
        let cover = self.covers.entry(match_id.to_string()).or_default();
        match cover.iter().position(|o| *o == outcome) {
            Some(idx) => {
                cover.remove(idx);
            }
            None => cover.push(outcome),
        }
    }

    /// Cover for a match; empty if the match was never selected
    pub fn cover(&self, match_id: &str) -> &[Outcome] {
        self.covers.get(match_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn match_ids(&self) -> impl Iterator<Item = &str> {
        self.covers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.covers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.covers.is_empty()
    }

    /// Product of cover sizes over the selected matches
    ///
    /// Zero if any cover is empty or nothing is selected. Saturates at
    /// `u128::MAX`.
    pub fn row_count(&self) -> u128 {
        if self.covers.is_empty() {
            return 0;
        }
        product(self.covers.values().map(Vec::len))
    }

    /// Product of cover sizes over `matches`, counting unselected matches as
    /// empty covers
    pub fn row_count_for(&self, matches: &[ComputedMatch]) -> u128 {
        if matches.is_empty() {
            return 0;
        }
        product(matches.iter().map(|m| self.cover(m.id()).len()))
    }

    /// Reject selections that reference matches not in the list, and match
    /// lists with duplicate ids
    pub fn validate(&self, matches: &[ComputedMatch]) -> Result<()> {
        let mut known = HashSet::with_capacity(matches.len());
        for m in matches {
            if !known.insert(m.id()) {
                return Err(PoolError::DuplicateMatch(m.id().to_string()));
            }
        }
        match self.covers.keys().find(|id| !known.contains(id.as_str())) {
            Some(id) => Err(PoolError::UnknownMatch(id.clone())),
            None => Ok(()),
        }
    }

    /// One advisory per match with nothing selected
    pub fn empty_covers(&self, matches: &[ComputedMatch]) -> Vec<Advisory> {
        matches
            .iter()
            .filter(|m| self.cover(m.id()).is_empty())
            .map(|m| Advisory::EmptySelection {
                match_id: m.id().to_string(),
            })
            .collect()
    }
}

fn product(sizes: impl Iterator<Item = usize>) -> u128 {
    let mut count: u128 = 1;
    for size in sizes {
        if size == 0 {
            return 0;
        }
        count = count.saturating_mul(size as u128);
    }
    count
}

impl From<BTreeMap<String, Vec<Outcome>>> for SelectionSet {
    fn from(raw: BTreeMap<String, Vec<Outcome>>) -> Self {
        let mut set = Self::new();
        for (id, outcomes) in raw {
            set.insert(id, outcomes);
        }
        set
    }
}

impl From<SelectionSet> for BTreeMap<String, Vec<Outcome>> {
    fn from(set: SelectionSet) -> Self {
        set.covers
    }
}
