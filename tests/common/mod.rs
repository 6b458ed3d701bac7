//! Common test utilities and fixtures

#![allow(dead_code)]

use poolev::common::types::{ComputedMatch, Match, Outcome};
use poolev::odds::compute_all;
use poolev::rows::SelectionSet;

/// The two-match coupon used throughout the docs
pub fn two_match_coupon() -> Vec<Match> {
    vec![
        Match::new("A", "Malmo FF", "IFK Goteborg")
            .with_odds(2.0, 3.0, 4.0)
            .with_shares(0.5, 0.3, 0.2),
        Match::new("B", "Djurgarden", "AIK")
            .with_odds(1.5, 4.0, 6.0)
            .with_shares(0.6, 0.25, 0.15),
    ]
}

/// A full coupon with varied odds and shares
pub fn coupon(n: usize) -> Vec<Match> {
    (1..=n)
        .map(|i| {
            let f = i as f64;
            let home = 1.5 + (f * 0.37) % 2.5;
            let draw = 3.0 + (f * 0.21) % 1.2;
            let away = 2.2 + (f * 0.53) % 4.0;
            let share_home = 0.30 + (f * 0.07) % 0.35;
            let share_draw = 0.15 + (f * 0.03) % 0.15;
            Match::new(format!("M{:02}", i), format!("Home {}", i), format!("Away {}", i))
                .with_odds(home, draw, away)
                .with_shares(share_home, share_draw, 1.0 - share_home - share_draw)
        })
        .collect()
}

pub fn computed(matches: &[Match]) -> Vec<ComputedMatch> {
    compute_all(matches)
}

/// Selection covering every sign of every match
pub fn all_signs(matches: &[ComputedMatch]) -> SelectionSet {
    let mut set = SelectionSet::new();
    for m in matches {
        set.insert(m.id(), Outcome::ALL);
    }
    set
}

pub fn assert_close(actual: f64, expected: f64, eps: f64) {
    assert!(
        (actual - expected).abs() <= eps,
        "expected {} within {} of {}",
        actual,
        eps,
        expected
    );
}
