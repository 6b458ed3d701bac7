//! Whole-coupon analysis built on the row pipeline

pub mod classify;
pub mod distribution;
pub mod pipeline;

pub use classify::{classify, CouponClassification, CouponTargets, CouponType};
pub use distribution::{outcome_distribution, MatchDistribution};
pub use pipeline::{analyze, analyze_computed, Analysis, AnalysisOptions};
