//! Joint probability, joint public share and value index of a row

use std::collections::BTreeMap;

use serde::Serialize;

use crate::common::types::{ComputedMatch, Outcome, Row};

/// Score fields of a row
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RowScore {
    pub joint_probability: f64,
    pub joint_share: f64,
    pub value_index: f64,
}

/// `probability / share`, or 0 when the share is zero
pub fn value_index(joint_probability: f64, joint_share: f64) -> f64 {
    if joint_share > 0.0 {
        joint_probability / joint_share
    } else {
        0.0
    }
}

/// Score one pick per match, `picks[i]` belonging to `matches[i]`
///
/// Outcomes without a probability (or share) contribute a factor of 1.
pub fn score_picks(matches: &[ComputedMatch], picks: &[Outcome]) -> RowScore {
    score_pairs(matches.iter().zip(picks.iter().copied()))
}

fn score_pairs<'a>(pairs: impl Iterator<Item = (&'a ComputedMatch, Outcome)>) -> RowScore {
    let mut joint_probability = 1.0;
    let mut joint_share = 1.0;

    for (m, outcome) in pairs {
        if let Some(p) = m.probability(outcome) {
            joint_probability *= p;
        }
        if let Some(s) = m.share(outcome) {
            joint_share *= s;
        }
    }

    RowScore {
        joint_probability,
        joint_share,
        value_index: value_index(joint_probability, joint_share),
    }
}

/// Score a picks map against the matches it was built from
///
/// Matches without a pick are skipped.
pub fn score(matches: &[ComputedMatch], picks: &BTreeMap<String, Outcome>) -> RowScore {
    score_pairs(
        matches
            .iter()
            .filter_map(|m| picks.get(m.id()).map(|o| (m, *o))),
    )
}

/// Build a scored row from one pick per match
pub fn build_row(matches: &[ComputedMatch], picks: &[Outcome]) -> Row {
    let score = score_picks(matches, picks);
    Row {
        picks: matches
            .iter()
            .zip(picks)
            .map(|(m, o)| (m.id().to_string(), *o))
            .collect(),
        joint_probability: score.joint_probability,
        joint_share: score.joint_share,
        value_index: score.value_index,
        payout: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::Match;
    use crate::odds::compute_all;

    fn matches() -> Vec<ComputedMatch> {
        compute_all(&[
            Match::new("A", "a1", "a2").with_odds(2.0, 3.0, 4.0).with_shares(0.5, 0.3, 0.2),
            Match::new("B", "b1", "b2").with_odds(1.5, 4.0, 6.0).with_shares(0.6, 0.25, 0.15),
        ])
    }

    #[test]
    fn test_joint_probability_of_two_homes() {
        let row = build_row(&matches(), &[Outcome::Home, Outcome::Home]);

        // 0.461538 * 0.615385
        assert!((row.joint_probability - 0.284024).abs() < 1e-5);
        assert!((row.joint_share - 0.3).abs() < 1e-12);
        assert!((row.value_index - row.joint_probability / 0.3).abs() < 1e-12);
        assert_eq!(row.picks.get("A"), Some(&Outcome::Home));
        assert!(row.payout.is_none());
    }

    #[test]
    fn test_zero_share_gives_zero_index() {
        let computed = compute_all(&[Match::new("A", "a1", "a2")
            .with_odds(2.0, 3.0, 4.0)
            .with_shares(0.0, 0.5, 0.5)]);
        let row = build_row(&computed, &[Outcome::Home]);

        assert_eq!(row.joint_share, 0.0);
        assert_eq!(row.value_index, 0.0);
    }

    #[test]
    fn test_missing_probability_is_identity() {
        let computed = compute_all(&[
            Match::new("A", "a1", "a2").with_odds(2.0, 3.0, 4.0).with_shares(0.5, 0.3, 0.2),
            Match::new("C", "c1", "c2"),
        ]);
        let row = build_row(&computed, &[Outcome::Draw, Outcome::Draw]);

        assert_eq!(row.joint_probability, computed[0].probability(Outcome::Draw).unwrap());
        assert_eq!(row.joint_share, 0.3);
    }

    #[test]
    fn test_score_by_picks_map_matches_build() {
        let m = matches();
        let row = build_row(&m, &[Outcome::Away, Outcome::Draw]);
        let rescored = score(&m, &row.picks);

        assert_eq!(rescored.joint_probability, row.joint_probability);
        assert_eq!(rescored.joint_share, row.joint_share);
        assert_eq!(rescored.value_index, row.value_index);
    }
}
