//! # orgrank-engine: subtree metrics and reward calculation.
//!
//! Two pure, synchronous components evaluated leaves-first:
//! - **Metrics engine**: one post-order pass yielding, per node, the
//!   cumulative value of its descendants, its rank tier (S1–S8), and the
//!   best rank found anywhere in its subtree.
//! - **Reward calculator**: mining, referral, and community rewards per node
//!   for a given mining rate, plus the grand total.
//!
//! Results are caches of the current tree state. Nothing is updated
//! incrementally: any change to the tree or the rate means calling
//! [`compute_report`] (or both halves) again.

pub mod metrics;
pub mod rank;
pub mod referral;
pub mod rewards;

pub use metrics::{compute_metrics, MetricsEngine};
pub use rank::TierClassifier;
pub use referral::{normalize_name, RecruitIndex};
pub use rewards::{compute_rewards, RewardCalculator};

use orgrank_core::{MetricsMap, MiningRate, RewardReport, Tree};

/// Recompute metrics and rewards for `tree` at `rate`.
pub fn compute_report(tree: &Tree, rate: MiningRate) -> (MetricsMap, RewardReport) {
    let metrics = compute_metrics(tree);
    let report = compute_rewards(tree, &metrics, rate);
    (metrics, report)
}
