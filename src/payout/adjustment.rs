//! Co-winner count adjustments
//!
//! The raw co-winner expectation (`total_stake * joint_share`) is too
//! optimistic for rare rows. An adjustment turns it into the head count used
//! to split the pool.

/// Maps a raw expected co-winner count to the count the pool is split by
pub trait WinnerAdjustment: Send + Sync {
    /// Identifier used in logs
    fn name(&self) -> &str;

    /// Adjusted expected number of winners
    fn adjust(&self, expected_winners: f64) -> f64;
}

/// Boxed adjustment for dynamic dispatch
pub type BoxedWinnerAdjustment = Box<dyn WinnerAdjustment>;

/// Stepped safety margin
///
/// | expected winners | adjusted           |
/// |------------------|--------------------|
/// | < 0.5            | max(1, e * 1.5)    |
/// | 0.5 ..< 1        | max(1, e * 1.2)    |
/// | 1 ..< 3          | e * 1.2            |
/// | >= 3             | e                  |
#[derive(Debug, Clone, Copy, Default)]
pub struct GraduatedSafetyMargin;

impl WinnerAdjustment for GraduatedSafetyMargin {
    fn name(&self) -> &str {
        "graduated_safety_margin"
    }

    fn adjust(&self, expected_winners: f64) -> f64 {
        if expected_winners < 0.5 {
            (expected_winners * 1.5).max(1.0)
        } else if expected_winners < 1.0 {
            (expected_winners * 1.2).max(1.0)
        } else if expected_winners < 3.0 {
            expected_winners * 1.2
        } else {
            expected_winners
        }
    }
}

/// Uses the raw expectation as is
#[derive(Debug, Clone, Copy, Default)]
pub struct Unadjusted;

impl WinnerAdjustment for Unadjusted {
    fn name(&self) -> &str {
        "unadjusted"
    }

    fn adjust(&self, expected_winners: f64) -> f64 {
        expected_winners
    }
}
