//! Tree mutation layer.
//!
//! Every mutation keeps the tree invariant: each non-root node's parent
//! lists it among its children, and everything is reachable from the root.
//! Derived metrics are never patched here; callers recompute after each
//! mutation.

use std::collections::HashSet;

use rand::Rng;
use tracing::debug;

use crate::constants::{
    DEFAULT_MEMBER_NAME, PLACEHOLDER_RECOMMENDER_PREFIX, PLACEHOLDER_RECOMMENDER_RANGE,
};
use crate::error::TreeError;
use crate::types::{Node, NodeId, Tree};

/// Fields of a node about to be added.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNode {
    pub name: String,
    pub recommender: String,
    pub value: f64,
}

impl NewNode {
    pub fn new(name: impl Into<String>, recommender: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            recommender: recommender.into(),
            value,
        }
    }

    /// A blank member with a random `ID-nnn` placeholder recommender.
    pub fn placeholder() -> Self {
        let suffix = rand::thread_rng().gen_range(0..PLACEHOLDER_RECOMMENDER_RANGE);
        Self::new(
            DEFAULT_MEMBER_NAME,
            format!("{PLACEHOLDER_RECOMMENDER_PREFIX}{suffix}"),
            0.0,
        )
    }
}

/// Partial update of a node's editable fields. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeUpdate {
    pub name: Option<String>,
    pub recommender: Option<String>,
    pub value: Option<f64>,
}

impl Tree {
    /// A tree holding a single root node.
    pub fn with_root(name: impl Into<String>, recommender: impl Into<String>) -> Self {
        let id = NodeId::random();
        let mut tree = Tree {
            root: Some(id.clone()),
            ..Tree::default()
        };
        tree.insert(Node::new(id, name, recommender, 0.0));
        tree
    }

    /// Append a new child under `parent` and return its id.
    pub fn add_child(&mut self, parent: &NodeId, new: NewNode) -> Result<NodeId, TreeError> {
        let id = NodeId::random();
        self.add_child_with_id(parent, id.clone(), new)?;
        Ok(id)
    }

    /// Append a new child with a caller-chosen id.
    ///
    /// Fails if the parent is unknown or the id is already taken.
    pub fn add_child_with_id(
        &mut self,
        parent: &NodeId,
        id: NodeId,
        new: NewNode,
    ) -> Result<(), TreeError> {
        if self.contains(&id) {
            return Err(TreeError::DuplicateId(id.to_string()));
        }
        let parent_node = self
            .get_mut(parent)
            .ok_or_else(|| TreeError::NodeNotFound(parent.to_string()))?;
        parent_node.children.push(id.clone());

        let mut node = Node::new(id, new.name, new.recommender, new.value);
        node.parent_id = Some(parent.clone());
        debug!(parent = %parent, child = %node.id, "added child node");
        self.insert(node);
        Ok(())
    }

    /// Apply a partial update to a node.
    pub fn update_node(&mut self, id: &NodeId, update: NodeUpdate) -> Result<(), TreeError> {
        let node = self
            .get_mut(id)
            .ok_or_else(|| TreeError::NodeNotFound(id.to_string()))?;
        if let Some(name) = update.name {
            node.name = name;
        }
        if let Some(recommender) = update.recommender {
            node.recommender = recommender;
        }
        if let Some(value) = update.value {
            node.value = value;
        }
        Ok(())
    }

    /// Remove a node and all of its descendants, detaching it from its parent.
    ///
    /// Returns the removed nodes in pre-order. Dangling child ids inside the
    /// removed subtree are skipped.
    pub fn remove_subtree(&mut self, id: &NodeId) -> Result<Vec<Node>, TreeError> {
        if self.root.as_ref() == Some(id) {
            return Err(TreeError::CannotRemoveRoot);
        }
        let node = self
            .get(id)
            .ok_or_else(|| TreeError::NodeNotFound(id.to_string()))?;
        let parent = node
            .parent_id
            .clone()
            .ok_or_else(|| TreeError::Detached(id.to_string()))?;

        let mut removed = Vec::new();
        let mut stack = vec![id.clone()];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                stack.extend(node.children.iter().rev().cloned());
                removed.push(node);
            }
        }

        if let Some(parent_node) = self.get_mut(&parent) {
            parent_node.children.retain(|child| child != id);
        }
        debug!(node = %id, removed = removed.len(), "removed subtree");
        Ok(removed)
    }

    /// Nodes whose name or recommender contains `query`, case-insensitively.
    ///
    /// A blank query matches every node.
    pub fn search(&self, query: &str) -> Vec<&Node> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.iter().collect();
        }
        self.iter()
            .filter(|node| {
                node.name.to_lowercase().contains(&query)
                    || node.recommender.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Verify the tree invariant and report the first violation found.
    ///
    /// Checks that the root exists, that every listed child points back at
    /// its parent, that no node is visited twice, and that every stored node
    /// is reachable from the root. Dangling child ids are tolerated, as the
    /// metrics engine tolerates them.
    pub fn check_integrity(&self) -> Result<(), TreeError> {
        let root = self.root.as_ref().ok_or(TreeError::EmptyTree)?;
        if !self.contains(root) {
            return Err(TreeError::NodeNotFound(root.to_string()));
        }

        let mut seen: HashSet<&NodeId> = HashSet::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                return Err(TreeError::Cycle(id.to_string()));
            }
            let Some(node) = self.get(id) else { continue };
            for child in &node.children {
                if let Some(child_node) = self.get(child) {
                    if child_node.parent_id.as_ref() != Some(id) {
                        return Err(TreeError::ParentMismatch {
                            child: child.to_string(),
                            parent: id.to_string(),
                        });
                    }
                }
                stack.push(child);
            }
        }

        match self.nodes.keys().find(|id| !seen.contains(id)) {
            Some(orphan) => Err(TreeError::Unreachable(orphan.to_string())),
            None => Ok(()),
        }
    }
}
