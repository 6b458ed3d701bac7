//! Fixed-order filter pipeline over scored rows

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::percentile::{band_bounds, clamp_percent, keep_count, sort_descending, PercentileBand, RankKey};
use crate::common::errors::Result;
use crate::common::types::Row;

/// One stage of the chain
///
/// Stages take ownership of the incoming rows and return the survivors.
/// They must be deterministic for a given input order.
pub trait RowFilter: Send + Sync {
    /// Stage name used in logs and reports
    fn name(&self) -> &'static str;

    fn apply(&self, rows: Vec<Row>) -> Vec<Row>;
}

/// Boxed filter for dynamic dispatch
pub type BoxedRowFilter = Box<dyn RowFilter>;

/// Keep the top `keep_percent` of rows ranked descending on a key
#[derive(Debug, Clone)]
pub struct TopPercent {
    pub key: RankKey,
    pub keep_percent: f64,
}

impl RowFilter for TopPercent {
    fn name(&self) -> &'static str {
        match self.key {
            RankKey::ValueIndex => "value_index_top_percent",
            RankKey::JointProbability => "probability_top_percent",
            RankKey::MonetaryEv => "monetary_ev_top_percent",
            RankKey::ExpectedPayout => "payout_top_percent",
        }
    }

    fn apply(&self, mut rows: Vec<Row>) -> Vec<Row> {
        if self.keep_percent >= 100.0 {
            return rows;
        }
        let keep = keep_count(self.keep_percent, rows.len());
        sort_descending(&mut rows, self.key);
        rows.truncate(keep);
        rows
    }
}

/// Keep rows whose key lies between two order statistics
///
/// Rows without the key (no pool attached) pass through untouched.
#[derive(Debug, Clone)]
pub struct PercentileBandFilter {
    pub key: RankKey,
    pub band: PercentileBand,
}

impl RowFilter for PercentileBandFilter {
    fn name(&self) -> &'static str {
        match self.key {
            RankKey::MonetaryEv => "monetary_ev_band",
            RankKey::ExpectedPayout => "payout_band",
            RankKey::ValueIndex => "value_index_band",
            RankKey::JointProbability => "probability_band",
        }
    }

    fn apply(&self, rows: Vec<Row>) -> Vec<Row> {
        let values: Option<Vec<f64>> = rows.iter().map(|r| self.key.value(r)).collect();
        let Some(values) = values else {
            debug!(stage = self.name(), "rows carry no {} value, skipping", self.key.as_str());
            return rows;
        };
        let Some((low, high)) = band_bounds(&values, self.band) else {
            return rows;
        };

        rows.into_iter()
            .zip(values)
            .filter(|(_, v)| *v >= low && *v <= high)
            .map(|(row, _)| row)
            .collect()
    }
}

/// Keep at most `limit` rows, best monetary EV first
#[derive(Debug, Clone)]
pub struct TopN {
    pub limit: usize,
}

impl RowFilter for TopN {
    fn name(&self) -> &'static str {
        "top_n_monetary_ev"
    }

    fn apply(&self, mut rows: Vec<Row>) -> Vec<Row> {
        if rows.iter().any(|r| r.monetary_ev().is_none()) {
            debug!(stage = self.name(), "rows carry no monetary EV, skipping");
            return rows;
        }
        sort_descending(&mut rows, RankKey::MonetaryEv);
        rows.truncate(self.limit);
        rows
    }
}

/// Keep rows with `value_index >= min`, preserving order
#[derive(Debug, Clone)]
pub struct MinValueIndex {
    pub min: f64,
}

impl RowFilter for MinValueIndex {
    fn name(&self) -> &'static str {
        "min_value_index"
    }

    fn apply(&self, rows: Vec<Row>) -> Vec<Row> {
        filter_by_min_value_index(rows, self.min)
    }
}

/// Keep rows with `value_index >= min`, preserving order
pub fn filter_by_min_value_index(rows: Vec<Row>, min: f64) -> Vec<Row> {
    rows.into_iter().filter(|r| r.value_index >= min).collect()
}

/// Parameters for the whole chain; defaults keep everything
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterParams {
    /// Stage 1: percent of rows kept by value index
    #[serde(default = "default_keep_percent")]
    pub value_keep_percent: f64,
    /// Stage 2: percent of rows kept by joint probability
    #[serde(default = "default_keep_percent")]
    pub probability_keep_percent: f64,
    /// Stage 3: monetary EV percentile band
    #[serde(default)]
    pub money_ev_band: PercentileBand,
    /// Stage 4: expected-payout percentile band
    #[serde(default)]
    pub payout_band: PercentileBand,
    /// Stage 5: cap on rows by monetary EV; 0 disables the cap
    #[serde(default)]
    pub top_n: Option<usize>,
    /// Trailing threshold on value index
    #[serde(default)]
    pub min_value_index: Option<f64>,
}

fn default_keep_percent() -> f64 {
    100.0
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            value_keep_percent: default_keep_percent(),
            probability_keep_percent: default_keep_percent(),
            money_ev_band: PercentileBand::FULL,
            payout_band: PercentileBand::FULL,
            top_n: None,
            min_value_index: None,
        }
    }
}

/// Row count after each stage that ran
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub stage: &'static str,
    pub rows_in: usize,
    pub rows_out: usize,
}

/// Ordered, validated stages
pub struct FilterChain {
    stages: Vec<BoxedRowFilter>,
}

impl FilterChain {
    /// Build the chain, dropping stages whose parameters keep everything
    ///
    /// Percentages are clamped into 0..=100. NaN percentages and bands with
    /// min > max are rejected.
    pub fn from_params(params: &FilterParams) -> Result<Self> {
        let value_keep = clamp_percent(params.value_keep_percent, "value_index_top_percent")?;
        let probability_keep = clamp_percent(params.probability_keep_percent, "probability_top_percent")?;
        let money_ev_band = params.money_ev_band.validated("monetary_ev_band")?;
        let payout_band = params.payout_band.validated("payout_band")?;

        let mut stages: Vec<BoxedRowFilter> = Vec::new();
        if value_keep < 100.0 {
            stages.push(Box::new(TopPercent {
                key: RankKey::ValueIndex,
                keep_percent: value_keep,
            }));
        }
        if probability_keep < 100.0 {
            stages.push(Box::new(TopPercent {
                key: RankKey::JointProbability,
                keep_percent: probability_keep,
            }));
        }
        if !money_ev_band.is_full() {
            stages.push(Box::new(PercentileBandFilter {
                key: RankKey::MonetaryEv,
                band: money_ev_band,
            }));
        }
        if !payout_band.is_full() {
            stages.push(Box::new(PercentileBandFilter {
                key: RankKey::ExpectedPayout,
                band: payout_band,
            }));
        }
        if let Some(limit) = params.top_n.filter(|n| *n > 0) {
            stages.push(Box::new(TopN { limit }));
        }
        if let Some(min) = params.min_value_index {
            stages.push(Box::new(MinValueIndex { min }));
        }

        Ok(Self { stages })
    }

    /// Chain with custom stages, applied in the given order
    pub fn with_stages(stages: Vec<BoxedRowFilter>) -> Self {
        Self { stages }
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run every stage, feeding each the previous stage's output
    pub fn apply(&self, rows: Vec<Row>) -> (Vec<Row>, Vec<StageReport>) {
        let mut rows = rows;
        let mut reports = Vec::with_capacity(self.stages.len());
        for stage in &self.stages {
            let rows_in = rows.len();
            rows = stage.apply(rows);
            debug!(stage = stage.name(), rows_in, rows_out = rows.len(), "filter stage");
            reports.push(StageReport {
                stage: stage.name(),
                rows_in,
                rows_out: rows.len(),
            });
        }
        (rows, reports)
    }
}

impl std::fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterChain")
            .field("stages", &self.stage_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::errors::PoolError;
    use crate::common::types::{Outcome, RowPayout};
    use std::collections::BTreeMap;

    fn row(id: usize, p: f64, vi: f64, ev: Option<f64>) -> Row {
        let mut picks = BTreeMap::new();
        picks.insert(format!("M{}", id), Outcome::Home);
        Row {
            picks,
            joint_probability: p,
            joint_share: p / vi,
            value_index: vi,
            payout: ev.map(|ev| RowPayout {
                monetary_ev: ev,
                expected_payout_on_win: ev * 10.0,
                expected_winners: 1.0,
            }),
        }
    }

    fn ids(rows: &[Row]) -> Vec<String> {
        rows.iter().flat_map(|r| r.picks.keys().cloned()).collect()
    }

    #[test]
    fn test_default_params_build_empty_chain() {
        let chain = FilterChain::from_params(&FilterParams::default()).unwrap();
        assert!(chain.is_empty());

        let rows = vec![row(1, 0.1, 2.0, None), row(2, 0.2, 1.0, None)];
        let (out, reports) = chain.apply(rows.clone());
        assert_eq!(out, rows);
        assert!(reports.is_empty());
    }

    #[test]
    fn test_value_then_probability() {
        let rows = vec![
            row(1, 0.05, 3.0, None),
            row(2, 0.20, 2.0, None),
            row(3, 0.10, 1.5, None),
            row(4, 0.30, 0.5, None),
        ];
        let params = FilterParams {
            value_keep_percent: 75.0,
            probability_keep_percent: 50.0,
            ..FilterParams::default()
        };
        let chain = FilterChain::from_params(&params).unwrap();
        let (out, reports) = chain.apply(rows);

        // top 3 by value: M1, M2, M3; then top 2 of those by probability
        assert_eq!(ids(&out), vec!["M2", "M3"]);
        assert_eq!(reports[0].rows_out, 3);
        assert_eq!(reports[1].rows_out, 2);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let rows = vec![
            row(1, 0.1, 1.0, None),
            row(2, 0.1, 1.0, None),
            row(3, 0.1, 1.0, None),
        ];
        let filter = TopPercent {
            key: RankKey::ValueIndex,
            keep_percent: 50.0,
        };
        assert_eq!(ids(&filter.apply(rows)), vec!["M1", "M2"]);
    }

    #[test]
    fn test_money_ev_band() {
        let rows: Vec<Row> = (0..5).map(|i| row(i, 0.1, 1.0, Some(i as f64))).collect();
        let filter = PercentileBandFilter {
            key: RankKey::MonetaryEv,
            band: PercentileBand::new(25.0, 75.0),
        };
        assert_eq!(ids(&filter.apply(rows)), vec!["M1", "M2", "M3"]);
    }

    #[test]
    fn test_band_skipped_without_payout() {
        let rows = vec![row(1, 0.1, 1.0, None), row(2, 0.2, 1.0, None)];
        let filter = PercentileBandFilter {
            key: RankKey::ExpectedPayout,
            band: PercentileBand::new(50.0, 100.0),
        };
        assert_eq!(filter.apply(rows.clone()), rows);
    }

    #[test]
    fn test_payout_band_keeps_middle_rows() {
        // expected payouts 0, 10, 20, 30, 40
        let rows: Vec<Row> = (0..5).map(|i| row(i, 0.1, 1.0, Some(i as f64))).collect();
        let filter = PercentileBandFilter {
            key: RankKey::ExpectedPayout,
            band: PercentileBand::new(50.0, 100.0),
        };
        assert_eq!(ids(&filter.apply(rows.clone())), vec!["M2", "M3", "M4"]);

        let filter = PercentileBandFilter {
            key: RankKey::ExpectedPayout,
            band: PercentileBand::new(0.0, 30.0),
        };
        // floor(0.3 * 4) = 1, so payouts up to 10
        assert_eq!(ids(&filter.apply(rows)), vec!["M0", "M1"]);
    }

    #[test]
    fn test_top_n_zero_is_disabled() {
        let params = FilterParams {
            top_n: Some(0),
            ..FilterParams::default()
        };
        let chain = FilterChain::from_params(&params).unwrap();
        assert!(chain.is_empty());

        let rows: Vec<Row> = (0..4).map(|i| row(i, 0.1, 1.0, Some(i as f64))).collect();
        let (out, reports) = chain.apply(rows.clone());
        assert_eq!(out, rows);
        assert!(reports.is_empty());
    }

    #[test]
    fn test_top_n_by_money_ev() {
        let rows: Vec<Row> = (0..5).map(|i| row(i, 0.1, 1.0, Some((i % 3) as f64))).collect();
        let filter = TopN { limit: 3 };
        // ev: M0=0, M1=1, M2=2, M3=0, M4=1
        assert_eq!(ids(&filter.apply(rows)), vec!["M2", "M1", "M4"]);
    }

    #[test]
    fn test_inverted_band_rejected() {
        let params = FilterParams {
            payout_band: PercentileBand::new(90.0, 10.0),
            ..FilterParams::default()
        };
        let err = FilterChain::from_params(&params).unwrap_err();
        assert!(matches!(
            err,
            PoolError::PercentileBoundsInverted {
                stage: "payout_band",
                ..
            }
        ));
    }

    #[test]
    fn test_min_value_index() {
        let rows = vec![row(1, 0.1, 0.8, None), row(2, 0.1, 1.2, None), row(3, 0.1, 1.0, None)];
        assert_eq!(ids(&filter_by_min_value_index(rows, 1.0)), vec!["M2", "M3"]);
    }

    #[test]
    fn test_stage_order_is_fixed() {
        let params = FilterParams {
            value_keep_percent: 90.0,
            probability_keep_percent: 90.0,
            money_ev_band: PercentileBand::new(10.0, 100.0),
            payout_band: PercentileBand::new(0.0, 90.0),
            top_n: Some(10),
            min_value_index: Some(1.0),
        };
        let chain = FilterChain::from_params(&params).unwrap();
        assert_eq!(
            chain.stage_names(),
            vec![
                "value_index_top_percent",
                "probability_top_percent",
                "monetary_ev_band",
                "payout_band",
                "top_n_monetary_ev",
                "min_value_index",
            ]
        );
    }
}
