//! Trait interfaces for orgrank.
//!
//! - [`RankClassifier`]: maps a node's subtree figures to a rank tier
//!   (orgrank-engine implements the standard S1–S8 table)

use crate::types::Rank;

/// Pure classification of a node into a rank tier.
///
/// Called once per node during the post-order metrics pass, after every
/// child has been evaluated.
pub trait RankClassifier: Send + Sync {
    /// Rank earned by a node whose descendants hold `children_total` in
    /// cumulative value. `branch_ranks` holds, per immediate child in child
    /// order, the highest rank level (0–8) found in that child's subtree.
    fn classify(&self, children_total: f64, branch_ranks: &[u8]) -> Option<Rank>;

    /// Number of immediate branches whose best rank level is at least `level`.
    fn qualifying_branches(&self, branch_ranks: &[u8], level: u8) -> usize {
        branch_ranks.iter().filter(|&&r| r >= level).count()
    }
}
