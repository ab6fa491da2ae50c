//! Subtree metrics: cumulative values, rank tiers, and best rank per subtree.
//!
//! A single post-order pass from the root. The traversal keeps its own
//! stack of frames instead of recursing, so a long chain of members cannot
//! exhaust the call stack.

use orgrank_core::traits::RankClassifier;
use orgrank_core::{MetricsMap, Node, NodeId, NodeMetrics, Tree};
use tracing::{debug, trace, warn};

use crate::rank::TierClassifier;

/// Computes [`NodeMetrics`] for every node reachable from the root.
#[derive(Debug, Clone, Default)]
pub struct MetricsEngine<C = TierClassifier> {
    classifier: C,
}

impl MetricsEngine {
    /// Engine using the standard S1–S8 tier table.
    pub fn new() -> Self {
        Self {
            classifier: TierClassifier::new(),
        }
    }
}

/// A node whose children are still being visited.
struct Frame<'a> {
    node: &'a Node,
    level: u32,
    next_child: usize,
    children_total: f64,
    branch_ranks: Vec<u8>,
}

impl<'a> Frame<'a> {
    fn new(node: &'a Node, level: u32) -> Self {
        Self {
            node,
            level,
            next_child: 0,
            children_total: 0.0,
            branch_ranks: Vec::with_capacity(node.children.len()),
        }
    }
}

impl<C: RankClassifier> MetricsEngine<C> {
    pub fn with_classifier(classifier: C) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Metrics for the nodes reachable from `tree.root`.
    ///
    /// An absent or missing root yields an empty map. A child id with no
    /// stored node contributes nothing (total 0, best rank 0) and gets no
    /// entry of its own.
    pub fn compute(&self, tree: &Tree) -> MetricsMap {
        let mut metrics = MetricsMap::with_capacity(tree.len());
        let Some(root) = tree.root_node() else {
            debug!(nodes = tree.len(), "no root; metrics empty");
            return metrics;
        };

        let mut stack = vec![Frame::new(root, 0)];
        while let Some(top) = stack.last_mut() {
            let node = top.node;
            if let Some(child_id) = node.children.get(top.next_child) {
                top.next_child += 1;
                match tree.get(child_id) {
                    Some(child) => {
                        let level = top.level + 1;
                        stack.push(Frame::new(child, level));
                    }
                    None => {
                        warn!(parent = %node.id, child = %child_id, "dangling child reference");
                        top.branch_ranks.push(0);
                    }
                }
                continue;
            }

            // All children visited.
            let Some(frame) = stack.pop() else { break };
            let node_metrics = self.finish(&frame);
            if let Some(parent) = stack.last_mut() {
                parent.children_total += node_metrics.total_with_self;
                parent.branch_ranks.push(node_metrics.max_rank_in_subtree);
            }
            metrics.insert(frame.node.id.clone(), node_metrics);
        }

        debug!(nodes = tree.len(), reachable = metrics.len(), "metrics computed");
        metrics
    }

    fn finish(&self, frame: &Frame<'_>) -> NodeMetrics {
        let rank = self
            .classifier
            .classify(frame.children_total, &frame.branch_ranks);
        let own_level = rank.map_or(0, |r| r.level());
        let max_rank_in_subtree = frame
            .branch_ranks
            .iter()
            .copied()
            .fold(own_level, u8::max);

        trace!(
            node = %frame.node.id,
            children_total = frame.children_total,
            rank = ?rank,
            max_rank_in_subtree,
            "node classified"
        );

        NodeMetrics {
            level: frame.level,
            children_total_value: frame.children_total,
            total_with_self: frame.node.own_value() + frame.children_total,
            rank,
            max_rank_in_subtree,
        }
    }
}

/// Metrics for every node reachable from the root, using the standard tiers.
pub fn compute_metrics(tree: &Tree) -> MetricsMap {
    MetricsEngine::new().compute(tree)
}

/// Ids of `tree`'s nodes that received no metrics (orphans).
pub fn unreached<'a>(tree: &'a Tree, metrics: &MetricsMap) -> Vec<&'a NodeId> {
    tree.nodes
        .keys()
        .filter(|id| !metrics.contains_key(*id))
        .collect()
}
