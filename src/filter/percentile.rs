//! Order statistics and ranking keys used by the filter stages

use serde::{Deserialize, Serialize};

use crate::common::errors::{PoolError, Result};
use crate::common::types::Row;

/// Row field a stage ranks or bands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankKey {
    ValueIndex,
    JointProbability,
    MonetaryEv,
    ExpectedPayout,
}

impl RankKey {
    /// Field value, `None` for payout fields on rows without a pool
    pub fn value(&self, row: &Row) -> Option<f64> {
        match self {
            RankKey::ValueIndex => Some(row.value_index),
            RankKey::JointProbability => Some(row.joint_probability),
            RankKey::MonetaryEv => row.monetary_ev(),
            RankKey::ExpectedPayout => row.expected_payout_on_win(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RankKey::ValueIndex => "value_index",
            RankKey::JointProbability => "joint_probability",
            RankKey::MonetaryEv => "monetary_ev",
            RankKey::ExpectedPayout => "expected_payout",
        }
    }
}

/// Inclusive percentile range, each end in 0..=100
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileBand {
    pub min: f64,
    pub max: f64,
}

impl PercentileBand {
    pub const FULL: PercentileBand = PercentileBand { min: 0.0, max: 100.0 };

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// True when the band keeps every row
    pub fn is_full(&self) -> bool {
        self.min <= 0.0 && self.max >= 100.0
    }

    /// Clamp both ends into 0..=100, rejecting NaN and inverted bounds
    pub fn validated(&self, stage: &'static str) -> Result<PercentileBand> {
        let min = clamp_percent(self.min, stage)?;
        let max = clamp_percent(self.max, stage)?;
        if min > max {
            return Err(PoolError::PercentileBoundsInverted { stage, min, max });
        }
        Ok(PercentileBand { min, max })
    }
}

impl Default for PercentileBand {
    fn default() -> Self {
        Self::FULL
    }
}

/// Clamp a percentage into 0..=100; NaN is an error
pub fn clamp_percent(value: f64, stage: &'static str) -> Result<f64> {
    if value.is_nan() {
        return Err(PoolError::InvalidPercent { stage, value });
    }
    Ok(value.clamp(0.0, 100.0))
}

/// `ceil(percent / 100 * n)`, never more than `n`
pub fn keep_count(percent: f64, n: usize) -> usize {
    let count = (percent * n as f64 / 100.0).ceil();
    if count <= 0.0 {
        0
    } else {
        (count as usize).min(n)
    }
}

/// Value at `floor(pct / 100 * (len - 1))` of an ascending slice
pub fn order_statistic(sorted: &[f64], pct: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let idx = (pct / 100.0 * (sorted.len() - 1) as f64).floor() as usize;
    sorted.get(idx.min(sorted.len() - 1)).copied()
}

/// Low and high values of a band over `values`
pub fn band_bounds(values: &[f64], band: PercentileBand) -> Option<(f64, f64)> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    Some((order_statistic(&sorted, band.min)?, order_statistic(&sorted, band.max)?))
}

/// Stable descending sort on a key; ties keep input order
pub fn sort_descending(rows: &mut [Row], key: RankKey) {
    rows.sort_by(|a, b| {
        let a = key.value(a).unwrap_or(f64::NEG_INFINITY);
        let b = key.value(b).unwrap_or(f64::NEG_INFINITY);
        b.total_cmp(&a)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keep_count_rounds_up() {
        assert_eq!(keep_count(50.0, 9), 5);
        assert_eq!(keep_count(100.0, 9), 9);
        assert_eq!(keep_count(0.0, 9), 0);
        assert_eq!(keep_count(1.0, 9), 1);
        assert_eq!(keep_count(10.0, 0), 0);
    }

    #[test]
    fn test_keep_count_whole_percent_is_exact() {
        assert_eq!(keep_count(7.0, 100), 7);
        assert_eq!(keep_count(70.0, 10), 7);
        assert_eq!(keep_count(29.0, 100), 29);
        assert_eq!(keep_count(60.0, 6561), 3937);
    }

    #[test]
    fn test_order_statistic_index() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(order_statistic(&sorted, 0.0), Some(1.0));
        assert_eq!(order_statistic(&sorted, 100.0), Some(5.0));
        // floor(0.3 * 4) = 1
        assert_eq!(order_statistic(&sorted, 30.0), Some(2.0));
        assert_eq!(order_statistic(&[], 50.0), None);
    }

    #[test]
    fn test_band_bounds_sorts_first() {
        let values = [5.0, -1.0, 3.0, 0.5];
        assert_eq!(band_bounds(&values, PercentileBand::new(0.0, 100.0)), Some((-1.0, 5.0)));
        assert_eq!(band_bounds(&values, PercentileBand::new(50.0, 70.0)), Some((0.5, 3.0)));
    }

    #[test]
    fn test_band_validation() {
        assert!(PercentileBand::new(0.0, 100.0).is_full());
        assert_eq!(
            PercentileBand::new(-5.0, 120.0).validated("band").unwrap(),
            PercentileBand::FULL
        );
        assert!(matches!(
            PercentileBand::new(80.0, 20.0).validated("band"),
            Err(PoolError::PercentileBoundsInverted { .. })
        ));
        assert!(matches!(
            PercentileBand::new(f64::NAN, 20.0).validated("band"),
            Err(PoolError::InvalidPercent { .. })
        ));
    }
}
