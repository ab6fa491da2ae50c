//! Rank tiers, reward shares, and tree defaults.

use crate::types::Rank;

/// Requirements a node must meet to hold a given rank.
///
/// A node qualifies when its descendants' cumulative value reaches
/// `min_children_total` and at least `min_branches` of its immediate
/// children have a subtree whose best rank level is `branch_level` or higher.
/// `min_branches == 0` means the tier has no branch requirement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierRequirement {
    pub rank: Rank,
    pub min_children_total: f64,
    pub branch_level: u8,
    pub min_branches: usize,
}

/// Qualifying branches required for every tier above S1.
pub const MIN_QUALIFYING_BRANCHES: usize = 2;

/// Rank tiers, highest first. The first satisfied tier wins.
pub const RANK_TIERS: [TierRequirement; 8] = [
    TierRequirement { rank: Rank::S8, min_children_total: 15_000_000.0, branch_level: 7, min_branches: MIN_QUALIFYING_BRANCHES },
    TierRequirement { rank: Rank::S7, min_children_total: 5_000_000.0, branch_level: 6, min_branches: MIN_QUALIFYING_BRANCHES },
    TierRequirement { rank: Rank::S6, min_children_total: 1_500_000.0, branch_level: 5, min_branches: MIN_QUALIFYING_BRANCHES },
    TierRequirement { rank: Rank::S5, min_children_total: 500_000.0, branch_level: 4, min_branches: MIN_QUALIFYING_BRANCHES },
    TierRequirement { rank: Rank::S4, min_children_total: 150_000.0, branch_level: 3, min_branches: MIN_QUALIFYING_BRANCHES },
    TierRequirement { rank: Rank::S3, min_children_total: 50_000.0, branch_level: 2, min_branches: MIN_QUALIFYING_BRANCHES },
    TierRequirement { rank: Rank::S2, min_children_total: 15_000.0, branch_level: 1, min_branches: MIN_QUALIFYING_BRANCHES },
    TierRequirement { rank: Rank::S1, min_children_total: 5_000.0, branch_level: 0, min_branches: 0 },
];

/// Share of each recruit's mining reward paid to the recruiter.
pub const REFERRAL_SHARE: f64 = 0.10;

/// Share of the rate-weighted subtree total paid per rank level.
pub const COMMUNITY_SHARE: f64 = 0.10;

/// Mining rates offered as presets (0.7%, 0.8%, 0.9%).
pub const MINING_RATE_PRESETS: [f64; 3] = [0.007, 0.008, 0.009];

/// Mining rate used when none is configured.
pub const DEFAULT_MINING_RATE: f64 = 0.007;

/// Display name given to the root of a fresh project.
pub const DEFAULT_ROOT_NAME: &str = "CEO";

/// Recommender text given to the root of a fresh project.
pub const DEFAULT_ROOT_RECOMMENDER: &str = "CEO-01";

/// Display name given to a newly added member.
pub const DEFAULT_MEMBER_NAME: &str = "New member";

/// Prefix of the placeholder recommender for a newly added member.
pub const PLACEHOLDER_RECOMMENDER_PREFIX: &str = "ID-";

/// Exclusive upper bound of the placeholder recommender suffix.
pub const PLACEHOLDER_RECOMMENDER_RANGE: u32 = 1000;

/// Length in bytes of a freshly generated node or project id.
pub const ID_BYTES: usize = 16;
