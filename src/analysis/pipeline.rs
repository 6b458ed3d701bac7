//! End-to-end run: matches and selections in, filtered scored rows out

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use super::classify::{classify, CouponClassification};
use super::distribution::{outcome_distribution, MatchDistribution};
use crate::common::errors::{Advisory, Result};
use crate::common::types::{ComputedMatch, Match, Row};
use crate::filter::{FilterChain, FilterParams, StageReport};
use crate::odds::{compute_all, missing_data, out_of_range};
use crate::payout::{PayoutEstimator, PoolSize, RowSetSummary};
use crate::rows::{GenerationMode, GeneratorOptions, RowGenerator, SelectionSet};

/// Everything one run needs besides the matches
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    pub generator: GeneratorOptions,
    /// Attach payout fields when set
    pub pool: Option<PoolSize>,
    pub filters: FilterParams,
}

/// Result of one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub generated_at: DateTime<Utc>,
    pub mode: GenerationMode,
    pub total_combinations: u128,
    /// Rows before filtering
    pub generated_rows: usize,
    pub pool: Option<Decimal>,
    pub matches: Vec<ComputedMatch>,
    pub stages: Vec<StageReport>,
    pub rows: Vec<Row>,
    pub summary: RowSetSummary,
    pub distribution: Vec<MatchDistribution>,
    pub classification: Option<CouponClassification>,
    pub advisories: Vec<Advisory>,
}

/// Compute matches from raw input, then run [`analyze_computed`]
pub fn analyze(matches: &[Match], selections: Option<&SelectionSet>, options: &AnalysisOptions) -> Result<Analysis> {
    analyze_computed(compute_all(matches), selections, options)
}

/// Generate, price and filter rows for already computed matches
///
/// Without a selection every outcome having both a probability and a share
/// is covered. The filter chain is validated before any rows are built.
pub fn analyze_computed(
    matches: Vec<ComputedMatch>,
    selections: Option<&SelectionSet>,
    options: &AnalysisOptions,
) -> Result<Analysis> {
    let chain = FilterChain::from_params(&options.filters)?;

    let full_cover;
    let selections = match selections {
        Some(s) => s,
        None => {
            full_cover = SelectionSet::full_cover(&matches);
            &full_cover
        }
    };

    let mut advisories = missing_data(&matches);
    advisories.extend(out_of_range(&matches));
    let generated = RowGenerator::new(options.generator).generate(&matches, selections)?;
    advisories.extend(generated.advisories);
    let generated_rows = generated.rows.len();

    let rows = match options.pool {
        Some(pool_size) => PayoutEstimator::new(pool_size).annotate(&generated.rows),
        None => generated.rows,
    };

    let (rows, stages) = chain.apply(rows);
    for advisory in &advisories {
        warn!(%advisory, "advisory");
    }
    info!(
        generated = generated_rows,
        kept = rows.len(),
        mode = ?generated.mode,
        "analysis finished"
    );

    Ok(Analysis {
        generated_at: Utc::now(),
        mode: generated.mode,
        total_combinations: generated.total_combinations,
        generated_rows,
        pool: options.pool.map(|p| p.pool()),
        summary: RowSetSummary::from_rows(&rows),
        distribution: outcome_distribution(&matches, &rows),
        classification: classify(&matches),
        matches,
        stages,
        rows,
        advisories,
    })
}
