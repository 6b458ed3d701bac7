//! Error and advisory types for the row pipeline

use serde::Serialize;
use thiserror::Error;

use super::types::Outcome;

/// Result type alias using our PoolError
pub type Result<T> = std::result::Result<T, PoolError>;

/// Invalid-input errors.
///
/// Everything here means the caller handed the pipeline something it cannot
/// interpret. Conditions that merely produce degraded or empty output are
/// reported as [`Advisory`] values instead.
#[derive(Error, Debug)]
pub enum PoolError {
    /// A selection references a match id that is not in the match list
    #[error("Unknown match id in selection: {0}")]
    UnknownMatch(String),

    /// Two matches share the same id
    #[error("Duplicate match id: {0}")]
    DuplicateMatch(String),

    /// An outcome sign that is not 1, X or 2
    #[error("Invalid outcome sign: {0:?}")]
    InvalidOutcome(String),

    /// A band filter received min percentile > max percentile
    #[error("Percentile bounds inverted for {stage}: min {min} > max {max}")]
    PercentileBoundsInverted {
        stage: &'static str,
        min: f64,
        max: f64,
    },

    /// A percentage parameter that is NaN or infinite
    #[error("Invalid percentage for {stage}: {value}")]
    InvalidPercent { stage: &'static str, value: f64 },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// JSON serialization/deserialization errors
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Reading coupon files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Odds-lookup collaborator failures
    #[error("Odds lookup error: {0}")]
    Lookup(String),
}

/// Recoverable conditions surfaced next to a result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    /// Outcomes of a match without any usable odds or share; a selected
    /// outcome listed here contributes a factor of 1 to joint probability
    MissingData {
        match_id: String,
        outcomes: Vec<Outcome>,
    },
    /// A match has no chosen outcome, so no rows can be built
    EmptySelection { match_id: String },
    /// Rows whose joint public share is zero; their value index is 0
    DegenerateRatio { rows: usize },
    /// Odds at or below 1.0, or a public share outside 0..=1; the value is
    /// still used as given
    OutOfRange {
        match_id: String,
        field: &'static str,
        outcome: Outcome,
        value: f64,
    },
}

impl std::fmt::Display for Advisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Advisory::MissingData { match_id, outcomes } => {
                let signs: Vec<&str> = outcomes.iter().map(|o| o.as_str()).collect();
                write!(f, "match {} has no probability for {}", match_id, signs.join(","))
            }
            Advisory::EmptySelection { match_id } => {
                write!(f, "match {} has no selected outcome", match_id)
            }
            Advisory::DegenerateRatio { rows } => {
                write!(f, "{} rows have zero joint public share", rows)
            }
            Advisory::OutOfRange {
                match_id,
                field,
                outcome,
                value,
            } => {
                write!(f, "match {} has {} {} out of range: {}", match_id, field, outcome, value)
            }
        }
    }
}
