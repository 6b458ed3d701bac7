//! Coupon shape classification from match probabilities

use serde::Serialize;

use crate::common::types::{ComputedMatch, Outcome};

/// Favourite is "clear" at this probability...
const CLEAR_FAVORITE_PROBABILITY: f64 = 0.55;
/// ...with at least this lead over the runner-up
const CLEAR_FAVORITE_GAP: f64 = 0.15;
/// A match is "very even" when no outcome reaches this
const VERY_EVEN_PROBABILITY: f64 = 0.42;
/// Coupons with more matches use the long-coupon targets
const SHORT_COUPON_MAX_MATCHES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponType {
    Favorite,
    Mixed,
    Even,
}

/// Suggested ranges for a system on this kind of coupon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CouponTargets {
    pub rows: &'static str,
    pub max_odds: &'static str,
    pub max_payout: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CouponClassification {
    pub coupon_type: CouponType,
    pub match_count: usize,
    pub average_max_probability: f64,
    pub clear_favorites: usize,
    pub very_even_matches: usize,
    pub targets: CouponTargets,
}

/// Classify a coupon; `None` for an empty match list
///
/// Outcomes without a probability count as 0.
pub fn classify(matches: &[ComputedMatch]) -> Option<CouponClassification> {
    if matches.is_empty() {
        return None;
    }
    let match_count = matches.len();

    let mut clear_favorites = 0;
    let mut very_even_matches = 0;
    let mut max_sum = 0.0;
    for m in matches {
        let mut probs: Vec<f64> = Outcome::ALL
            .iter()
            .map(|o| m.probability(*o).unwrap_or(0.0))
            .collect();
        probs.sort_by(|a, b| b.total_cmp(a));
        let (max, second) = (probs[0], probs[1]);

        if max >= CLEAR_FAVORITE_PROBABILITY && max - second > CLEAR_FAVORITE_GAP {
            clear_favorites += 1;
        }
        if max < VERY_EVEN_PROBABILITY {
            very_even_matches += 1;
        }
        max_sum += max;
    }
    let average_max_probability = max_sum / match_count as f64;

    let n = match_count as f64;
    let coupon_type = if clear_favorites as f64 >= n * 0.6 {
        CouponType::Favorite
    } else if very_even_matches as f64 >= n * 0.5 || average_max_probability < 0.40 {
        CouponType::Even
    } else {
        CouponType::Mixed
    };

    Some(CouponClassification {
        coupon_type,
        match_count,
        average_max_probability,
        clear_favorites,
        very_even_matches,
        targets: targets(coupon_type, match_count),
    })
}

fn targets(coupon_type: CouponType, match_count: usize) -> CouponTargets {
    let (rows, max_odds, max_payout) = if match_count <= SHORT_COUPON_MAX_MATCHES {
        match coupon_type {
            CouponType::Favorite => ("50-150", "2,000-5,000", "10k-50k"),
            CouponType::Mixed => ("150-400", "5,000-20,000", "50k-200k"),
            CouponType::Even => ("400-1,000", "20,000-100,000", "200k-1M"),
        }
    } else {
        match coupon_type {
            CouponType::Favorite => ("200-500", "50,000-200,000", "500k-2M"),
            CouponType::Mixed => ("500-2,000", "200,000-1M", "2M-10M"),
            CouponType::Even => ("2,000-10,000", "1M-10M", "10M-50M"),
        }
    };
    CouponTargets {
        rows,
        max_odds,
        max_payout,
    }
}
