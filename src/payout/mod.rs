//! Payout and monetary EV estimation
//!
//! Pool = 0.70 x total stake + bonus. For each row the expected number of
//! co-winners is `total_stake * joint_share`, adjusted by a pluggable
//! [`WinnerAdjustment`]; the pool is split over that head count.

pub mod adjustment;
pub mod estimator;
pub mod summary;

pub use adjustment::{BoxedWinnerAdjustment, GraduatedSafetyMargin, Unadjusted, WinnerAdjustment};
pub use estimator::{PayoutEstimator, PoolSize, PAYOUT_RATIO};
pub use summary::{PayoutStats, RowSetSummary};
