//! Standard S1–S8 rank classification.

use orgrank_core::constants::{TierRequirement, RANK_TIERS};
use orgrank_core::traits::RankClassifier;
use orgrank_core::Rank;

/// The production classifier over a highest-first tier table.
///
/// Tiers are checked strictly from the top; the first one whose value
/// threshold and branch requirement both hold is the node's rank.
#[derive(Debug, Clone, Copy)]
pub struct TierClassifier {
    tiers: &'static [TierRequirement],
}

impl TierClassifier {
    /// Classifier over the standard [`RANK_TIERS`] table.
    pub fn new() -> Self {
        Self { tiers: &RANK_TIERS }
    }

    pub fn tiers(&self) -> &'static [TierRequirement] {
        self.tiers
    }
}

impl Default for TierClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl RankClassifier for TierClassifier {
    fn classify(&self, children_total: f64, branch_ranks: &[u8]) -> Option<Rank> {
        self.tiers
            .iter()
            .find(|tier| {
                children_total >= tier.min_children_total
                    && (tier.min_branches == 0
                        || self.qualifying_branches(branch_ranks, tier.branch_level)
                            >= tier.min_branches)
            })
            .map(|tier| tier.rank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn classify(total: f64, branches: &[u8]) -> Option<Rank> {
        TierClassifier::new().classify(total, branches)
    }

    #[test]
    fn nothing_below_s1() {
        assert_eq!(classify(0.0, &[]), None);
        assert_eq!(classify(4_999.99, &[8, 8]), None);
    }

    #[test]
    fn s1_at_threshold_without_branches() {
        assert_eq!(classify(5_000.0, &[]), Some(Rank::S1));
        assert_eq!(classify(14_999.0, &[1, 1]), Some(Rank::S1));
    }

    #[test]
    fn s2_needs_two_branches() {
        assert_eq!(classify(15_000.0, &[1]), Some(Rank::S1));
        assert_eq!(classify(15_000.0, &[1, 0]), Some(Rank::S1));
        assert_eq!(classify(15_000.0, &[1, 1]), Some(Rank::S2));
        assert_eq!(classify(15_000.0, &[0, 3, 1]), Some(Rank::S2));
    }

    #[test]
    fn highest_tier_wins() {
        assert_eq!(classify(15_000_000.0, &[7, 7]), Some(Rank::S8));
        assert_eq!(classify(15_000_000.0, &[7, 6]), Some(Rank::S7));
        assert_eq!(classify(5_000_000.0, &[8, 8, 8]), Some(Rank::S7));
    }

    #[test]
    fn value_gates_even_with_strong_branches() {
        // Strong branches but only enough value for S3
        assert_eq!(classify(50_000.0, &[8, 8]), Some(Rank::S3));
        assert_eq!(classify(149_999.0, &[8, 8]), Some(Rank::S3));
        assert_eq!(classify(150_000.0, &[8, 8]), Some(Rank::S4));
    }

    #[test]
    fn each_tier_boundary() {
        let c = TierClassifier::new();
        for tier in c.tiers() {
            let branches = [tier.branch_level, tier.branch_level];
            assert_eq!(
                c.classify(tier.min_children_total, &branches),
                Some(tier.rank),
                "tier {}",
                tier.rank
            );
        }
    }

    #[test]
    fn negative_and_nan_totals_get_no_rank() {
        assert_eq!(classify(-1_000_000.0, &[8, 8]), None);
        assert_eq!(classify(f64::NAN, &[8, 8]), None);
    }

    #[test]
    fn qualifying_branches_counts_at_least() {
        let c = TierClassifier::new();
        assert_eq!(c.qualifying_branches(&[0, 1, 2, 3], 2), 2);
        assert_eq!(c.qualifying_branches(&[], 1), 0);
        assert_eq!(c.qualifying_branches(&[5, 5], 0), 2);
    }

    #[test]
    fn custom_table() {
        static ONLY_S1: [TierRequirement; 1] = [TierRequirement {
            rank: Rank::S1,
            min_children_total: 10.0,
            branch_level: 0,
            min_branches: 0,
        }];
        let c = TierClassifier { tiers: &ONLY_S1 };
        assert_eq!(c.classify(10.0, &[]), Some(Rank::S1));
        assert_eq!(c.classify(1e9, &[8, 8]), Some(Rank::S1));
    }

    proptest! {
        #[test]
        fn rank_monotonic_in_total(
            a in 0.0f64..20_000_000.0,
            b in 0.0f64..20_000_000.0,
            branches in proptest::collection::vec(0u8..=8, 0..6),
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let r_lo = classify(lo, &branches).map_or(0, Rank::level);
            let r_hi = classify(hi, &branches).map_or(0, Rank::level);
            prop_assert!(r_lo <= r_hi, "rank fell from {} to {} as total grew", r_lo, r_hi);
        }

        #[test]
        fn rank_monotonic_in_branches(
            total in 0.0f64..20_000_000.0,
            branches in proptest::collection::vec(0u8..=7, 0..6),
        ) {
            let before = classify(total, &branches).map_or(0, Rank::level);
            let boosted: Vec<u8> = branches.iter().map(|b| b + 1).collect();
            let after = classify(total, &boosted).map_or(0, Rank::level);
            prop_assert!(before <= after);
        }
    }
}
