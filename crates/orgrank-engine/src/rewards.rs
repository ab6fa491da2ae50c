//! Reward calculation: mining, referral, and community rewards per node.
//!
//! - **Mining**: own value × mining rate.
//! - **Referral**: [`REFERRAL_SHARE`] of the mining rewards of every member
//!   whose recommender text names this member.
//! - **Community**: descendants' cumulative value × mining rate ×
//!   [`COMMUNITY_SHARE`] × rank multiplier (0 without a rank).
//!
//! The calculator holds only the rate. Every call recomputes all three
//! components from the tree and metrics it is given.

use orgrank_core::constants::{COMMUNITY_SHARE, REFERRAL_SHARE};
use orgrank_core::{MetricsMap, MiningRate, Node, NodeMetrics, RewardEntry, RewardReport, Tree};
use tracing::debug;

use crate::referral::RecruitIndex;

/// Reward calculator for one mining rate.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RewardCalculator {
    rate: MiningRate,
}

impl RewardCalculator {
    pub fn new(rate: MiningRate) -> Self {
        Self { rate }
    }

    pub fn rate(&self) -> MiningRate {
        self.rate
    }

    /// Mining reward on a node's own value.
    pub fn mining_reward(&self, node: &Node) -> f64 {
        node.own_value() * self.rate.fraction()
    }

    /// Referral reward owed to `recruiter` for the members it recruited.
    pub fn referral_reward(&self, index: &RecruitIndex<'_>, recruiter: &Node) -> f64 {
        let base: f64 = index
            .recruits_of(recruiter)
            .map(|recruit| self.mining_reward(recruit))
            .sum();
        base * REFERRAL_SHARE
    }

    /// Community reward for a node's metrics. Unranked nodes earn nothing.
    pub fn community_reward(&self, metrics: &NodeMetrics) -> f64 {
        metrics.children_total_value
            * self.rate.fraction()
            * COMMUNITY_SHARE
            * metrics.rank_multiplier()
    }

    /// One entry per node in `tree`, ordered by level (root first).
    ///
    /// Nodes missing from `metrics` (not reachable from the root) are
    /// treated as level 0 with no rank and no descendants. Entries on the
    /// same level follow node id order, not insertion order.
    pub fn compute(&self, tree: &Tree, metrics: &MetricsMap) -> RewardReport {
        let index = RecruitIndex::build(tree);

        let mut entries: Vec<RewardEntry> = tree
            .iter()
            .map(|node| {
                let node_metrics = metrics.get(&node.id);
                let mining = self.mining_reward(node);
                let referral = self.referral_reward(&index, node);
                let community = node_metrics.map_or(0.0, |m| self.community_reward(m));
                RewardEntry {
                    id: node.id.clone(),
                    recommender: node.recommender.clone(),
                    name: node.name.clone(),
                    level: node_metrics.map_or(0, |m| m.level),
                    rank: node_metrics.and_then(|m| m.rank),
                    mining,
                    referral,
                    community,
                    total: mining + referral + community,
                }
            })
            .collect();
        entries.sort_by_key(|entry| entry.level);

        let grand_total: f64 = entries.iter().map(|entry| entry.total).sum();
        debug!(
            entries = entries.len(),
            recommenders = index.recommender_count(),
            rate = %self.rate,
            grand_total,
            "rewards computed"
        );

        RewardReport {
            entries,
            grand_total,
        }
    }
}

/// Rewards for every node in `tree` at `rate`.
pub fn compute_rewards(tree: &Tree, metrics: &MetricsMap, rate: MiningRate) -> RewardReport {
    RewardCalculator::new(rate).compute(tree, metrics)
}
