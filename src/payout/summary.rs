//! Aggregate figures over a row set

use serde::Serialize;

use crate::common::types::Row;

/// Payout statistics, present only when rows carry payout fields
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PayoutStats {
    pub average_payout: f64,
    pub min_payout: f64,
    pub max_payout: f64,
    /// Sum of monetary EV over the set
    pub total_monetary_ev: f64,
}

/// Derived figures for a row set
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RowSetSummary {
    pub rows: usize,
    /// Reciprocal of the lowest joint probability in the set
    pub max_odds: Option<f64>,
    /// Sum of joint probabilities: the chance that one of the rows wins
    pub hit_probability: f64,
    pub payout: Option<PayoutStats>,
}

impl RowSetSummary {
    pub fn from_rows(rows: &[Row]) -> Self {
        let min_probability = rows
            .iter()
            .map(|r| r.joint_probability)
            .filter(|p| *p > 0.0)
            .min_by(|a, b| a.total_cmp(b));

        Self {
            rows: rows.len(),
            max_odds: min_probability.map(|p| 1.0 / p),
            hit_probability: rows.iter().map(|r| r.joint_probability).sum(),
            payout: payout_stats(rows),
        }
    }
}

fn payout_stats(rows: &[Row]) -> Option<PayoutStats> {
    let payouts: Vec<_> = rows.iter().map(|r| r.payout).collect::<Option<Vec<_>>>()?;
    if payouts.is_empty() {
        return None;
    }

    let mut min_payout = f64::INFINITY;
    let mut max_payout = f64::NEG_INFINITY;
    let mut sum = 0.0;
    let mut total_monetary_ev = 0.0;
    for p in &payouts {
        min_payout = min_payout.min(p.expected_payout_on_win);
        max_payout = max_payout.max(p.expected_payout_on_win);
        sum += p.expected_payout_on_win;
        total_monetary_ev += p.monetary_ev;
    }

    Some(PayoutStats {
        average_payout: sum / payouts.len() as f64,
        min_payout,
        max_payout,
        total_monetary_ev,
    })
}
