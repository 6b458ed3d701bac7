//! Percentile filter chain
//!
//! Stages run in a fixed order, each on the previous stage's output:
//!
//! 1. value index, top K%
//! 2. joint probability, top K%
//! 3. monetary EV percentile band
//! 4. expected payout percentile band
//! 5. top N by monetary EV
//!
//! followed by an optional minimum value index. Stages whose parameters keep
//! everything are left out of the chain. All sorts are stable on a total
//! order, so a given input and parameter set always yields the same rows.

pub mod chain;
pub mod percentile;

pub use chain::{
    filter_by_min_value_index, BoxedRowFilter, FilterChain, FilterParams, MinValueIndex,
    PercentileBandFilter, RowFilter, StageReport, TopN, TopPercent,
};
pub use percentile::{band_bounds, keep_count, order_statistic, PercentileBand, RankKey};
