//! Weighted inspection scoring.
//!
//! Computes the overall 0–100 score and qualitative rating band from the
//! scored checklist items of an inspection. `na` items carry no weight;
//! items without a template weight contribute with [`DEFAULT_WEIGHT`].

use serde::{Deserialize, Serialize};

use crate::status::ItemScore;

/// Weight applied to an item with no template item attached.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// A scoreable item: its pass/fail score, optional 1–5 rating, and weight.
#[derive(Debug, Clone, Copy)]
pub struct ScoredItem {
    pub score: ItemScore,
    pub rating: Option<i16>,
    pub weight: f64,
}

/// Qualitative rating band derived from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingBand {
    Excellent,
    Good,
    Fair,
    Poor,
    Failing,
}

impl RatingBand {
    pub fn as_str(self) -> &'static str {
        match self {
            RatingBand::Excellent => "excellent",
            RatingBand::Good => "good",
            RatingBand::Fair => "fair",
            RatingBand::Poor => "poor",
            RatingBand::Failing => "failing",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "excellent" => Some(RatingBand::Excellent),
            "good" => Some(RatingBand::Good),
            "fair" => Some(RatingBand::Fair),
            "poor" => Some(RatingBand::Poor),
            "failing" => Some(RatingBand::Failing),
            _ => None,
        }
    }
}

/// Map a 0–100 score to its rating band (inclusive lower bounds).
pub fn rating_for_score(score: f64) -> RatingBand {
    if score >= 90.0 {
        RatingBand::Excellent
    } else if score >= 75.0 {
        RatingBand::Good
    } else if score >= 60.0 {
        RatingBand::Fair
    } else if score >= 40.0 {
        RatingBand::Poor
    } else {
        RatingBand::Failing
    }
}

/// Round to two decimal places (the stored precision of overall scores).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute the weighted overall score and rating band.
///
/// Each item contributes `weight` to the total weight. Items with a numeric
/// rating contribute `(rating/5)*100*weight`; plain pass/fail items
/// contribute `100*weight` or `0`.
///
/// When no scoreable item remains (`total_weight == 0`), the inspection
/// scores a full 100/excellent. That is long-standing observable behaviour
/// relied on by downstream reporting; do not change it here.
pub fn compute_score(items: &[ScoredItem]) -> (f64, RatingBand) {
    let mut total_weight = 0.0_f64;
    let mut weighted_score = 0.0_f64;

    for item in items {
        if item.score == ItemScore::Na {
            continue;
        }
        total_weight += item.weight;
        weighted_score += match item.rating {
            Some(rating) => (f64::from(rating) / 5.0) * 100.0 * item.weight,
            None => match item.score {
                ItemScore::Pass => 100.0 * item.weight,
                _ => 0.0,
            },
        };
    }

    let score = if total_weight > 0.0 {
        round2(weighted_score / total_weight)
    } else {
        100.0
    };

    (score, rating_for_score(score))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(score: ItemScore, rating: Option<i16>, weight: f64) -> ScoredItem {
        ScoredItem {
            score,
            rating,
            weight,
        }
    }

    #[test]
    fn all_pass_scores_100() {
        let items = vec![
            item(ItemScore::Pass, None, 1.0),
            item(ItemScore::Pass, None, 2.0),
        ];
        assert_eq!(compute_score(&items), (100.0, RatingBand::Excellent));
    }

    #[test]
    fn all_fail_scores_0() {
        let items = vec![
            item(ItemScore::Fail, None, 1.0),
            item(ItemScore::Fail, None, 3.0),
        ];
        assert_eq!(compute_score(&items), (0.0, RatingBand::Failing));
    }

    #[test]
    fn weighted_mix_rounds_to_two_decimals() {
        // Weight-2 item rated 5/5 plus weight-1 unrated fail:
        // (5/5*100*2 + 0) / 3 = 66.666... -> 66.67, fair.
        let items = vec![
            item(ItemScore::Pass, Some(5), 2.0),
            item(ItemScore::Fail, None, 1.0),
        ];
        assert_eq!(compute_score(&items), (66.67, RatingBand::Fair));
    }

    #[test]
    fn rating_overrides_pass_fail_contribution() {
        // A failed item with rating 3 still contributes 60, not 0.
        let items = vec![item(ItemScore::Fail, Some(3), 1.0)];
        assert_eq!(compute_score(&items), (60.0, RatingBand::Fair));
    }

    #[test]
    fn na_items_excluded_entirely() {
        let items = vec![
            item(ItemScore::Pass, None, 1.0),
            item(ItemScore::Na, Some(1), 100.0),
        ];
        assert_eq!(compute_score(&items), (100.0, RatingBand::Excellent));
    }

    #[test]
    fn empty_scoreable_set_is_full_marks() {
        assert_eq!(compute_score(&[]), (100.0, RatingBand::Excellent));

        let only_na = vec![item(ItemScore::Na, None, 1.0)];
        assert_eq!(compute_score(&only_na), (100.0, RatingBand::Excellent));
    }

    #[test]
    fn band_boundaries_are_inclusive_lower_bounds() {
        assert_eq!(rating_for_score(90.0), RatingBand::Excellent);
        assert_eq!(rating_for_score(89.99), RatingBand::Good);
        assert_eq!(rating_for_score(75.0), RatingBand::Good);
        assert_eq!(rating_for_score(74.99), RatingBand::Fair);
        assert_eq!(rating_for_score(60.0), RatingBand::Fair);
        assert_eq!(rating_for_score(59.99), RatingBand::Poor);
        assert_eq!(rating_for_score(40.0), RatingBand::Poor);
        assert_eq!(rating_for_score(39.99), RatingBand::Failing);
        assert_eq!(rating_for_score(0.0), RatingBand::Failing);
    }

    #[test]
    fn score_stays_in_range_for_valid_ratings() {
        for rating in 1..=5_i16 {
            for score in [ItemScore::Pass, ItemScore::Fail] {
                let (value, _) = compute_score(&[item(score, Some(rating), 3.5)]);
                assert!((0.0..=100.0).contains(&value), "score {value} out of range");
            }
        }
    }

    #[test]
    fn rating_band_string_round_trip() {
        for band in [
            RatingBand::Excellent,
            RatingBand::Good,
            RatingBand::Fair,
            RatingBand::Poor,
            RatingBand::Failing,
        ] {
            assert_eq!(RatingBand::parse(band.as_str()), Some(band));
        }
    }

    #[test]
    fn round2_behaviour() {
        assert_eq!(round2(66.666_666), 66.67);
        assert_eq!(round2(66.664), 66.66);
        assert_eq!(round2(100.0), 100.0);
    }
}
