//! Recruiter matching by display name.
//!
//! A member recruits another when the other's recommender text equals the
//! member's display name after trimming and lowercasing. Matching is purely
//! textual; ids play no part, and differently spelled names never match.

use std::collections::HashMap;

use orgrank_core::{Node, Tree};

/// Canonical form used for name/recommender comparison.
pub fn normalize_name(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Nodes grouped by normalized recommender text, built once per computation.
///
/// Looking up a recruiter's recruits is a single hash probe, so a full
/// reward pass stays linear in the number of nodes.
#[derive(Debug, Default)]
pub struct RecruitIndex<'a> {
    by_recommender: HashMap<String, Vec<&'a Node>>,
}

impl<'a> RecruitIndex<'a> {
    pub fn build(tree: &'a Tree) -> Self {
        let mut by_recommender: HashMap<String, Vec<&'a Node>> = HashMap::new();
        for node in tree.iter() {
            by_recommender
                .entry(normalize_name(&node.recommender))
                .or_default()
                .push(node);
        }
        Self { by_recommender }
    }

    /// Members who name `recruiter` as their recommender, excluding itself.
    pub fn recruits_of<'s>(&'s self, recruiter: &'s Node) -> impl Iterator<Item = &'a Node> + 's {
        self.by_recommender
            .get(&normalize_name(&recruiter.name))
            .into_iter()
            .flatten()
            .copied()
            .filter(move |recruit| recruit.id != recruiter.id)
    }

    /// Number of distinct normalized recommender texts seen.
    pub fn recommender_count(&self) -> usize {
        self.by_recommender.len()
    }
}
