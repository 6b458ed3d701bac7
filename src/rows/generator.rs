//! Cross-product expansion of selections into scored rows

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::scorer::build_row;
use super::selection::SelectionSet;
use crate::common::errors::{Advisory, Result};
use crate::common::types::{ComputedMatch, Outcome, Row};

/// Largest row set produced in one run
pub const MAX_ROWS: usize = 50_000;

/// Draw budget per wanted row in the rejection sampler
const DRAWS_PER_ROW: usize = 64;

/// Generator settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Above this many combinations the space is sampled instead of enumerated
    pub max_rows: usize,
    /// Seed for the sampler; entropy when `None`
    pub seed: Option<u64>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            max_rows: MAX_ROWS,
            seed: None,
        }
    }
}

/// How the row set was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// Nothing generated because a cover was empty
    Empty,
    /// Every combination, in odometer order
    Exhaustive,
    /// A uniform sample of distinct combinations
    Sampled,
}

/// Output of one generation run
#[derive(Debug, Clone)]
pub struct GeneratedRows {
    pub rows: Vec<Row>,
    pub mode: GenerationMode,
    /// Size of the full combination space (saturating)
    pub total_combinations: u128,
    pub advisories: Vec<Advisory>,
}

/// Expands a [`SelectionSet`] over an ordered list of matches
#[derive(Debug, Clone, Default)]
pub struct RowGenerator {
    options: GeneratorOptions,
}

impl RowGenerator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Build every row of the selection, or a distinct sample of it
    ///
    /// Match order defines pick order; within a match, cover order is kept.
    /// Unknown match ids in the selection are an error. An empty cover yields
    /// no rows and an [`Advisory::EmptySelection`].
    pub fn generate(&self, matches: &[ComputedMatch], selections: &SelectionSet) -> Result<GeneratedRows> {
        selections.validate(matches)?;

        let empty = selections.empty_covers(matches);
        if matches.is_empty() || !empty.is_empty() {
            debug!(matches = matches.len(), empty = empty.len(), "cannot build rows");
            return Ok(GeneratedRows {
                rows: Vec::new(),
                mode: GenerationMode::Empty,
                total_combinations: 0,
                advisories: empty,
            });
        }

        let covers: Vec<&[Outcome]> = matches.iter().map(|m| selections.cover(m.id())).collect();
        let total = selections.row_count_for(matches);

        let (rows, mode) = if total <= self.options.max_rows as u128 {
            debug!(total = %total, "enumerating all rows");
            (enumerate(matches, &covers), GenerationMode::Exhaustive)
        } else {
            info!(total = %total, target = self.options.max_rows, "row space too large, sampling");
            let mut rng = match self.options.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            (
                sample(matches, &covers, total, self.options.max_rows, &mut rng),
                GenerationMode::Sampled,
            )
        };

        let mut advisories = Vec::new();
        let degenerate = rows.iter().filter(|r| r.joint_share <= 0.0).count();
        if degenerate > 0 {
            warn!(rows = degenerate, "rows with zero joint public share");
            advisories.push(Advisory::DegenerateRatio { rows: degenerate });
        }

        Ok(GeneratedRows {
            rows,
            mode,
            total_combinations: total,
            advisories,
        })
    }
}

/// Rows for a selection with default options
pub fn generate_rows(matches: &[ComputedMatch], selections: &SelectionSet) -> Result<Vec<Row>> {
    RowGenerator::default()
        .generate(matches, selections)
        .map(|generated| generated.rows)
}

/// Iterative odometer over the covers; the last match turns fastest
fn enumerate(matches: &[ComputedMatch], covers: &[&[Outcome]]) -> Vec<Row> {
    let mut rows = Vec::new();
    let mut digits = vec![0usize; covers.len()];
    let mut picks: Vec<Outcome> = covers.iter().map(|c| c[0]).collect();

    loop {
        rows.push(build_row(matches, &picks));

        let mut pos = covers.len();
        loop {
            if pos == 0 {
                return rows;
            }
            pos -= 1;
            digits[pos] += 1;
            if digits[pos] < covers[pos].len() {
                picks[pos] = covers[pos][digits[pos]];
                break;
            }
            digits[pos] = 0;
            picks[pos] = covers[pos][0];
        }
    }
}

/// Distinct uniform sample of `target` rows out of `total`
///
/// Dense spaces (at most twice the target) are sampled by index without
/// replacement. Sparse spaces draw one pick per match and reject repeated
/// keys; the draw budget is bounded, so the loop always terminates.
fn sample<R: Rng>(
    matches: &[ComputedMatch],
    covers: &[&[Outcome]],
    total: u128,
    target: usize,
    rng: &mut R,
) -> Vec<Row> {
    let target_u = target as u128;
    if total <= target_u {
        return enumerate(matches, covers);
    }

    if total <= target_u.saturating_mul(2) {
        return index::sample(rng, total as usize, target)
            .into_iter()
            .map(|i| build_row(matches, &decode(i, covers)))
            .collect();
    }

    let mut seen: HashSet<Vec<u8>> = HashSet::with_capacity(target);
    let mut rows = Vec::with_capacity(target);
    let budget = target.saturating_mul(DRAWS_PER_ROW);
    let mut draws = 0usize;

    while rows.len() < target && draws < budget {
        draws += 1;
        let key: Vec<u8> = covers.iter().map(|c| rng.gen_range(0..c.len()) as u8).collect();
        if seen.contains(&key) {
            continue;
        }
        let picks: Vec<Outcome> = covers.iter().zip(&key).map(|(c, k)| c[*k as usize]).collect();
        rows.push(build_row(matches, &picks));
        seen.insert(key);
    }

    if rows.len() < target {
        warn!(
            collected = rows.len(),
            target, draws, "sampling budget exhausted before target"
        );
    }
    debug!(draws, rows = rows.len(), "sampling finished");
    rows
}

/// Mixed-radix decode of a combination index, in odometer order
fn decode(mut idx: usize, covers: &[&[Outcome]]) -> Vec<Outcome> {
    let mut picks = vec![Outcome::Home; covers.len()];
    for pos in (0..covers.len()).rev() {
        let len = covers[pos].len();
        picks[pos] = covers[pos][idx % len];
        idx /= len;
    }
    picks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::errors::PoolError;
    use crate::common::types::Match;
    use crate::odds::compute_all;

    fn coupon(n: usize) -> Vec<ComputedMatch> {
        let matches: Vec<Match> = (1..=n)
            .map(|i| {
                Match::new(format!("M{}", i), "Home", "Away")
                    .with_odds(1.8 + i as f64 * 0.1, 3.4, 4.2)
                    .with_shares(0.5, 0.3, 0.2)
            })
            .collect();
        compute_all(&matches)
    }

    fn keys(rows: &[Row]) -> HashSet<Vec<Outcome>> {
        rows.iter().map(|r| r.picks.values().copied().collect()).collect()
    }

    #[test]
    fn test_exhaustive_order() {
        let matches = coupon(2);
        let mut selections = SelectionSet::new();
        selections.insert("M1", [Outcome::Draw, Outcome::Home]);
        selections.insert("M2", [Outcome::Away, Outcome::Home]);

        let generated = RowGenerator::default().generate(&matches, &selections).unwrap();
        assert_eq!(generated.mode, GenerationMode::Exhaustive);
        assert_eq!(generated.total_combinations, 4);

        let signs: Vec<String> = generated.rows.iter().map(|r| r.signs(&matches)).collect();
        assert_eq!(signs, vec!["X2", "X1", "12", "11"]);
    }

    #[test]
    fn test_empty_cover_returns_no_rows() {
        let matches = coupon(3);
        let mut selections = SelectionSet::full_cover(&matches);
        selections.insert("M2", Vec::<Outcome>::new());

        let generated = RowGenerator::default().generate(&matches, &selections).unwrap();
        assert!(generated.rows.is_empty());
        assert_eq!(generated.mode, GenerationMode::Empty);
        assert_eq!(
            generated.advisories,
            vec![Advisory::EmptySelection {
                match_id: "M2".to_string()
            }]
        );
    }

    #[test]
    fn test_unknown_match_is_error() {
        let matches = coupon(1);
        let mut selections = SelectionSet::full_cover(&matches);
        selections.insert("M7", [Outcome::Home]);

        let result = RowGenerator::default().generate(&matches, &selections);
        assert!(matches!(result, Err(PoolError::UnknownMatch(_))));
    }

    #[test]
    fn test_sparse_sampling_is_distinct() {
        let matches = coupon(8);
        let selections = SelectionSet::full_cover(&matches);
        let generator = RowGenerator::new(GeneratorOptions {
            max_rows: 500,
            seed: Some(7),
        });

        let generated = generator.generate(&matches, &selections).unwrap();
        assert_eq!(generated.mode, GenerationMode::Sampled);
        assert_eq!(generated.total_combinations, 6561);
        assert_eq!(generated.rows.len(), 500);
        assert_eq!(keys(&generated.rows).len(), 500);
    }

    #[test]
    fn test_space_equal_to_cap_is_enumerated() {
        let matches = coupon(4);
        let selections = SelectionSet::full_cover(&matches);
        let generator = RowGenerator::new(GeneratorOptions {
            max_rows: 81,
            seed: Some(5),
        });

        let generated = generator.generate(&matches, &selections).unwrap();
        assert_eq!(generated.mode, GenerationMode::Exhaustive);
        assert_eq!(generated.total_combinations, 81);
        assert_eq!(generated.rows.len(), 81);
        assert_eq!(keys(&generated.rows).len(), 81);
    }

    #[test]
    fn test_dense_sampling_is_distinct() {
        let matches = coupon(4);
        let selections = SelectionSet::full_cover(&matches);
        let generator = RowGenerator::new(GeneratorOptions {
            max_rows: 80,
            seed: Some(1),
        });

        let generated = generator.generate(&matches, &selections).unwrap();
        assert_eq!(generated.mode, GenerationMode::Sampled);
        assert_eq!(generated.rows.len(), 80);
        assert_eq!(keys(&generated.rows).len(), 80);
    }

    #[test]
    fn test_seeded_sampling_is_reproducible() {
        let matches = coupon(8);
        let selections = SelectionSet::full_cover(&matches);
        let generator = RowGenerator::new(GeneratorOptions {
            max_rows: 200,
            seed: Some(42),
        });

        let a = generator.generate(&matches, &selections).unwrap().rows;
        let b = generator.generate(&matches, &selections).unwrap().rows;
        assert_eq!(a, b);
    }

    #[test]
    fn test_decode_matches_enumeration() {
        let matches = coupon(3);
        let selections = SelectionSet::full_cover(&matches);
        let covers: Vec<&[Outcome]> = matches.iter().map(|m| selections.cover(m.id())).collect();

        let rows = enumerate(&matches, &covers);
        for (i, row) in rows.iter().enumerate() {
            let picks: Vec<Outcome> = row.picks.values().copied().collect();
            assert_eq!(decode(i, &covers), picks);
        }
    }

    #[test]
    fn test_degenerate_ratio_advisory() {
        let matches = compute_all(&[Match::new("M1", "A", "B")
            .with_odds(2.0, 3.0, 4.0)
            .with_shares(0.0, 0.6, 0.4)]);
        let selections = SelectionSet::full_cover(&matches);

        let generated = RowGenerator::default().generate(&matches, &selections).unwrap();
        assert_eq!(generated.rows.len(), 3);
        assert_eq!(generated.advisories, vec![Advisory::DegenerateRatio { rows: 1 }]);
    }
}
