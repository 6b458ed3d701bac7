//! poolev Library
//!
//! Turns pool-betting coupon data (per-match odds and public-money shares)
//! into filtered sets of scored rows.
//!
//! Data flows one way:
//!
//! ```text
//! Match --odds--> ComputedMatch --SelectionSet--> Row --FilterChain--> Row
//!                                          PayoutEstimator ---^
//! ```

pub mod analysis;
pub mod common;
pub mod config;
pub mod filter;
pub mod lookup;
pub mod odds;
pub mod payout;
pub mod rows;

// Re-export commonly used types
pub use common::errors::{Advisory, PoolError, Result};
pub use common::types::{ComputedMatch, Match, Outcome, OutcomeMap, Row, RowPayout};
pub use config::types::AppConfig;

pub use analysis::{analyze, analyze_computed, Analysis, AnalysisOptions};
pub use filter::{FilterChain, FilterParams, PercentileBand};
pub use lookup::{apply_lookup, InMemoryOddsLookup, OddsLookup};
pub use odds::{compute_all, compute_match};
pub use payout::{PayoutEstimator, PoolSize, RowSetSummary, WinnerAdjustment};
pub use rows::{generate_rows, GeneratorOptions, RowGenerator, SelectionSet, MAX_ROWS};
