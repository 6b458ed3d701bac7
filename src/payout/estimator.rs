//! Pool size and per-row payout expectations

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::adjustment::{BoxedWinnerAdjustment, GraduatedSafetyMargin, WinnerAdjustment};
use crate::common::types::{Row, RowPayout};

/// Share of the stake volume paid back to winners
pub const PAYOUT_RATIO: Decimal = dec!(0.70);

/// Stake volume and bonus money for one round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSize {
    /// Total amount staked by all players, one unit per row
    pub total_stake: Decimal,
    /// Extra money added to the pool
    #[serde(default)]
    pub bonus: Decimal,
}

impl PoolSize {
    pub fn new(total_stake: Decimal, bonus: Decimal) -> Self {
        Self { total_stake, bonus }
    }

    /// `0.70 * total_stake + bonus`
    pub fn pool(&self) -> Decimal {
        self.total_stake * PAYOUT_RATIO + self.bonus
    }
}

/// Estimates payout and monetary EV for rows given a pool size
pub struct PayoutEstimator {
    pool_size: PoolSize,
    pool: f64,
    total_stake: f64,
    adjustment: BoxedWinnerAdjustment,
}

impl PayoutEstimator {
    /// Estimator with the graduated safety margin
    pub fn new(pool_size: PoolSize) -> Self {
        Self::with_adjustment(pool_size, Box::new(GraduatedSafetyMargin))
    }

    pub fn with_adjustment(pool_size: PoolSize, adjustment: BoxedWinnerAdjustment) -> Self {
        let pool = pool_size.pool().to_f64().unwrap_or(0.0).max(0.0);
        let total_stake = pool_size.total_stake.to_f64().unwrap_or(0.0).max(0.0);
        debug!(pool, total_stake, adjustment = adjustment.name(), "payout estimator ready");
        Self {
            pool_size,
            pool,
            total_stake,
            adjustment,
        }
    }

    pub fn pool_size(&self) -> &PoolSize {
        &self.pool_size
    }

    /// Pool as a float, for per-row arithmetic
    pub fn pool(&self) -> f64 {
        self.pool
    }

    pub fn adjustment(&self) -> &dyn WinnerAdjustment {
        self.adjustment.as_ref()
    }

    /// Payout fields for one row
    ///
    /// Payout per winner is capped at the pool; the row's EV subtracts a unit
    /// stake.
    pub fn estimate(&self, joint_probability: f64, joint_share: f64) -> RowPayout {
        let expected_winners = self.total_stake * joint_share;
        let adjusted = self.adjustment.adjust(expected_winners);
        let expected_payout_on_win = if adjusted > 0.0 {
            (self.pool / adjusted).min(self.pool)
        } else {
            self.pool
        };

        RowPayout {
            monetary_ev: expected_payout_on_win * joint_probability - 1.0,
            expected_payout_on_win,
            expected_winners,
        }
    }

    /// Copies of `rows` with payout fields attached
    pub fn annotate(&self, rows: &[Row]) -> Vec<Row> {
        rows.iter()
            .map(|row| row.with_payout(self.estimate(row.joint_probability, row.joint_share)))
            .collect()
    }
}

impl std::fmt::Debug for PayoutEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayoutEstimator")
            .field("pool_size", &self.pool_size)
            .field("adjustment", &self.adjustment.name())
            .finish()
    }
}
