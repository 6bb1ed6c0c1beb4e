//! Batch-relative risk tiers via quantile bucketing.
//!
//! Tiers are equal-population tertiles of the batch's own probability
//! distribution, not fixed probability ranges. The same probability can land
//! in different tiers across batches; tier boundaries are recomputed from
//! each batch. Edges use linear-interpolation quantiles over the empirical
//! distribution and bins are right-closed, so ties at a boundary fall into
//! the lower tier.

/// Risk tier, ascending in probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    /// Tier name as written to the output CSV.
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by tier assignment.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BucketError {
    /// Fewer rows than tiers.
    #[error("cannot assign 3 risk tiers to a batch of {0} rows (need at least 3)")]
    BatchTooSmall(usize),

    /// The probability distribution is too degenerate to split into three
    /// distinct bins (e.g. all probabilities equal).
    #[error("quantile edges are not unique ({edges:?}); probabilities are too concentrated to split into 3 tiers")]
    DegenerateDistribution { edges: [f32; 4] },
}

/// Partition `probabilities` into three equal-population tiers.
///
/// Returns one tier per input element, in input order. Fails on batches of
/// fewer than 3 rows and on distributions whose tertile edges collide.
pub fn assign_tiers(probabilities: &[f32]) -> Result<Vec<RiskTier>, BucketError> {
    if probabilities.len() < 3 {
        return Err(BucketError::BatchTooSmall(probabilities.len()));
    }

    let mut sorted = probabilities.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let edges = [
        sorted[0],
        quantile(&sorted, 1.0 / 3.0),
        quantile(&sorted, 2.0 / 3.0),
        sorted[sorted.len() - 1],
    ];
    if edges.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err(BucketError::DegenerateDistribution { edges });
    }

    Ok(probabilities
        .iter()
        .map(|&p| {
            if p <= edges[1] {
                RiskTier::Low
            } else if p <= edges[2] {
                RiskTier::Medium
            } else {
                RiskTier::High
            }
        })
        .collect())
}

/// Linear-interpolation quantile of pre-sorted data.
fn quantile(sorted: &[f32], q: f64) -> f32 {
    debug_assert!(!sorted.is_empty());
    let position = q * (sorted.len() - 1) as f64;
    let below = position.floor() as usize;
    let above = position.ceil() as usize;
    if below == above {
        return sorted[below];
    }
    let fraction = (position - below as f64) as f32;
    sorted[below] + fraction * (sorted[above] - sorted[below])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    fn tier_counts(tiers: &[RiskTier]) -> [usize; 3] {
        let mut counts = [0usize; 3];
        for tier in tiers {
            counts[*tier as usize] += 1;
        }
        counts
    }

    #[test]
    fn quantile_interpolates_linearly() {
        let sorted = [0.0, 1.0, 2.0, 3.0];
        assert_abs_diff_eq!(quantile(&sorted, 0.0), 0.0);
        assert_abs_diff_eq!(quantile(&sorted, 0.5), 1.5);
        assert_abs_diff_eq!(quantile(&sorted, 1.0), 3.0);
    }

    #[test]
    fn nine_evenly_spread_rows_split_three_ways() {
        let probs = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9];
        let tiers = assign_tiers(&probs).unwrap();
        assert_eq!(tier_counts(&tiers), [3, 3, 3]);
        assert_eq!(tiers[0], RiskTier::Low);
        assert_eq!(tiers[4], RiskTier::Medium);
        assert_eq!(tiers[8], RiskTier::High);
    }

    #[test]
    fn tiers_follow_input_order_not_sorted_order() {
        let probs = [0.9, 0.1, 0.5];
        let tiers = assign_tiers(&probs).unwrap();
        assert_eq!(tiers, vec![RiskTier::High, RiskTier::Low, RiskTier::Medium]);
    }

    #[test]
    fn tier_order_is_monotone_in_probability() {
        let probs = [0.42, 0.07, 0.88, 0.61, 0.13, 0.95, 0.33, 0.5, 0.71, 0.26];
        let tiers = assign_tiers(&probs).unwrap();

        let max_in = |tier: RiskTier| {
            probs
                .iter()
                .zip(&tiers)
                .filter(|(_, t)| **t == tier)
                .map(|(p, _)| *p)
                .fold(f32::MIN, f32::max)
        };
        let min_in = |tier: RiskTier| {
            probs
                .iter()
                .zip(&tiers)
                .filter(|(_, t)| **t == tier)
                .map(|(p, _)| *p)
                .fold(f32::MAX, f32::min)
        };

        assert!(max_in(RiskTier::Low) <= min_in(RiskTier::Medium));
        assert!(max_in(RiskTier::Medium) <= min_in(RiskTier::High));
    }

    #[test]
    fn populations_are_balanced_for_distinct_values() {
        let probs: Vec<f32> = (0..10).map(|i| 0.05 + 0.09 * i as f32).collect();
        let tiers = assign_tiers(&probs).unwrap();
        let counts = tier_counts(&tiers);
        for count in counts {
            assert!((3..=4).contains(&count), "unbalanced counts: {counts:?}");
        }
    }

    #[test]
    fn batch_relative_boundaries_move_with_the_batch() {
        let narrow = assign_tiers(&[0.10, 0.11, 0.12]).unwrap();
        let wide = assign_tiers(&[0.10, 0.50, 0.90]).unwrap();
        // 0.10 is "low" in both batches only because it is each batch's
        // minimum; 0.12 is "high" in the narrow batch despite being a low
        // absolute probability.
        assert_eq!(narrow[2], RiskTier::High);
        assert_eq!(wide[0], RiskTier::Low);
    }

    #[rstest]
    #[case(&[])]
    #[case(&[0.5])]
    #[case(&[0.1, 0.9])]
    fn batches_smaller_than_three_fail(#[case] probs: &[f32]) {
        let err = assign_tiers(probs).unwrap_err();
        assert!(matches!(err, BucketError::BatchTooSmall(n) if n == probs.len()));
    }

    #[rstest]
    #[case(&[0.5, 0.5, 0.5, 0.5])]
    #[case(&[0.2, 0.2, 0.2, 0.9])]
    fn degenerate_distributions_fail(#[case] probs: &[f32]) {
        let err = assign_tiers(probs).unwrap_err();
        assert!(matches!(err, BucketError::DegenerateDistribution { .. }));
    }
}
