//! Score aggregation strategies
//!
//! Each detector family reduces its hit list to one [0,100] score with
//! one of five fixed strategies. The formulas below are the scoring
//! contract: coefficients, clamps and tie-breaks are reproduced exactly
//! and covered by tests. An empty hit list scores 0 under every
//! strategy; there is no base-score leakage.

use crate::models::Hit;
use std::collections::BTreeSet;

/// Closed set of aggregation strategies. One pure function per tag;
/// never dispatched by name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Strategy {
    /// Top weight plus `decay` times the sum of the remaining weights
    WeightedMaxDecay { decay: f64 },
    /// Plain sum of weights, capped at 100
    AdditiveCapped,
    /// Base plus a harmonic sum over the *distinct* weight set
    RiskAccumulation { base: f64, max: f64 },
    /// Max weight scaled 10% per additional distinct rule
    SeverityBased,
    /// Base plus max weight scaled 10% per distinct rule
    RiskWeighted { base: f64 },
}

impl Strategy {
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::WeightedMaxDecay { .. } => "weighted_max_decay",
            Strategy::AdditiveCapped => "additive_capped",
            Strategy::RiskAccumulation { .. } => "risk_accumulation",
            Strategy::SeverityBased => "severity_based",
            Strategy::RiskWeighted { .. } => "risk_weighted",
        }
    }

    /// Reduce a hit list to one clamped score
    pub fn score(&self, hits: &[Hit]) -> f64 {
        if hits.is_empty() {
            return 0.0;
        }
        let total = match *self {
            Strategy::WeightedMaxDecay { decay } => {
                let mut weights: Vec<u32> = hits.iter().map(|h| h.weight).collect();
                weights.sort_unstable_by(|a, b| b.cmp(a));
                let rest: f64 = weights[1..].iter().map(|&w| w as f64).sum();
                weights[0] as f64 + decay * rest
            }
            Strategy::AdditiveCapped => hits.iter().map(|h| h.weight as f64).sum(),
            Strategy::RiskAccumulation { base, max } => {
                // Equal weights count once: the harmonic sum runs over
                // the distinct weight set, sorted descending.
                let distinct: BTreeSet<u32> = hits.iter().map(|h| h.weight).collect();
                let mut total = base;
                for (i, &w) in distinct.iter().rev().enumerate() {
                    total += w as f64 / (i as f64 + 1.0);
                }
                return total.clamp(0.0, max);
            }
            Strategy::SeverityBased => {
                let max_w = max_weight(hits);
                let rules = distinct_rules(hits);
                max_w * (1.0 + 0.1 * (rules as f64 - 1.0))
            }
            Strategy::RiskWeighted { base } => {
                let max_w = max_weight(hits);
                let rules = distinct_rules(hits);
                base + max_w * (1.0 + 0.1 * rules as f64)
            }
        };
        total.clamp(0.0, 100.0)
    }
}

fn max_weight(hits: &[Hit]) -> f64 {
    hits.iter().map(|h| h.weight).max().unwrap_or(0) as f64
}

fn distinct_rules(hits: &[Hit]) -> usize {
    hits.iter()
        .map(|h| h.rule_id.as_str())
        .collect::<BTreeSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(rule_id: &str, weight: u32) -> Hit {
        Hit {
            rule_id: rule_id.to_string(),
            label: rule_id.to_string(),
            description: String::new(),
            weight,
            start: 0,
            end: 0,
            text: String::new(),
        }
    }

    fn all_strategies() -> Vec<Strategy> {
        vec![
            Strategy::WeightedMaxDecay { decay: 0.2 },
            Strategy::AdditiveCapped,
            Strategy::RiskAccumulation {
                base: 20.0,
                max: 100.0,
            },
            Strategy::SeverityBased,
            Strategy::RiskWeighted { base: 30.0 },
        ]
    }

    #[test]
    fn test_empty_hits_score_zero_everywhere() {
        for s in all_strategies() {
            assert_eq!(s.score(&[]), 0.0, "{} must score empty as 0", s.label());
        }
    }

    #[test]
    fn test_scores_stay_in_bounds_under_flood() {
        let flood: Vec<Hit> = (0..50).map(|i| hit(&format!("r{i}"), 100)).collect();
        for s in all_strategies() {
            let score = s.score(&flood);
            assert!(
                (0.0..=100.0).contains(&score),
                "{} out of bounds: {}",
                s.label(),
                score
            );
        }
    }

    #[test]
    fn test_weighted_max_decay_exact() {
        let s = Strategy::WeightedMaxDecay { decay: 0.2 };
        assert_eq!(s.score(&[hit("a", 60)]), 60.0);
        // 80 + 0.2 * (60 + 40) = 100
        assert_eq!(s.score(&[hit("a", 60), hit("b", 80), hit("c", 40)]), 100.0);
        // 50 + 0.2 * 30 = 56
        assert_eq!(s.score(&[hit("a", 30), hit("b", 50)]), 56.0);
    }

    #[test]
    fn test_weighted_max_decay_zero_decay_is_plain_max() {
        let s = Strategy::WeightedMaxDecay { decay: 0.0 };
        assert_eq!(s.score(&[hit("a", 40), hit("b", 90), hit("c", 70)]), 90.0);
    }

    #[test]
    fn test_additive_capped_monotonic() {
        let s = Strategy::AdditiveCapped;
        let mut hits = Vec::new();
        let mut last = 0.0;
        for i in 0..10 {
            hits.push(hit(&format!("r{i}"), 30));
            let score = s.score(&hits);
            assert!(score >= last, "additive_capped decreased: {last} -> {score}");
            last = score;
        }
        assert_eq!(last, 100.0);
    }

    #[test]
    fn test_risk_accumulation_distinct_weights_once() {
        let s = Strategy::RiskAccumulation {
            base: 20.0,
            max: 100.0,
        };
        // distinct {80}: 20 + 80 = 100 -> also 100 with a duplicate
        let single = s.score(&[hit("a", 80)]);
        let doubled = s.score(&[hit("a", 80), hit("b", 80)]);
        assert_eq!(single, doubled);
        // distinct {60, 40}: 20 + 60 + 40/2 = 100 -> capped; smaller case:
        // distinct {30, 10}: 20 + 30 + 5 = 55
        assert_eq!(s.score(&[hit("a", 10), hit("b", 30)]), 55.0);
    }

    #[test]
    fn test_risk_accumulation_order_invariant() {
        let s = Strategy::RiskAccumulation {
            base: 10.0,
            max: 100.0,
        };
        let forward = s.score(&[hit("a", 50), hit("b", 20), hit("c", 35)]);
        let backward = s.score(&[hit("c", 35), hit("b", 20), hit("a", 50)]);
        assert_eq!(forward, backward);
        // 10 + 50 + 35/2 + 20/3
        assert!((forward - (10.0 + 50.0 + 17.5 + 20.0 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn test_risk_accumulation_respects_max() {
        let s = Strategy::RiskAccumulation {
            base: 20.0,
            max: 90.0,
        };
        assert_eq!(s.score(&[hit("a", 100), hit("b", 85)]), 90.0);
    }

    #[test]
    fn test_severity_based_scales_with_distinct_rules() {
        let s = Strategy::SeverityBased;
        assert_eq!(s.score(&[hit("a", 70)]), 70.0);
        // two hits of the same rule: still one distinct rule
        assert_eq!(s.score(&[hit("a", 70), hit("a", 70)]), 70.0);
        // 70 * (1 + 0.1) = 77
        assert_eq!(s.score(&[hit("a", 70), hit("b", 40)]), 77.0);
    }

    #[test]
    fn test_risk_weighted_exact() {
        let s = Strategy::RiskWeighted { base: 30.0 };
        // 30 + 50 * 1.1 = 85
        assert!((s.score(&[hit("a", 50)]) - 85.0).abs() < 1e-9);
        // 30 + 50 * 1.2 = 90
        assert!((s.score(&[hit("a", 50), hit("b", 20)]) - 90.0).abs() < 1e-9);
    }
}
