//! Implied probability vs public share

use crate::common::types::{Outcome, OutcomeMap};

/// `probability - share` for outcomes where both exist
///
/// Outcomes missing either input are left out, never zero-filled.
pub fn differentials(probability: &OutcomeMap<f64>, share: &OutcomeMap<f64>) -> OutcomeMap<f64> {
    Outcome::ALL
        .into_iter()
        .filter_map(|o| match (probability.get(o), share.get(o)) {
            (Some(p), Some(s)) => Some((o, p - s)),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_differential_values() {
        let probability = OutcomeMap::full(0.4, 0.35, 0.25);
        let share = OutcomeMap::full(0.5, 0.3, 0.2);

        let diff = differentials(&probability, &share);
        assert!((diff.get(Outcome::Home).unwrap() - -0.1).abs() < 1e-12);
        assert!((diff.get(Outcome::Draw).unwrap() - 0.05).abs() < 1e-12);
        assert!((diff.get(Outcome::Away).unwrap() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_missing_inputs_are_omitted() {
        let probability = OutcomeMap {
            home: Some(0.6),
            draw: Some(0.4),
            away: None,
        };
        let share = OutcomeMap {
            home: Some(0.7),
            draw: None,
            away: Some(0.1),
        };

        let diff = differentials(&probability, &share);
        assert_eq!(diff.len(), 1);
        assert_eq!(diff.get(Outcome::Draw), None);
        assert_eq!(diff.get(Outcome::Away), None);
    }
}
