//! Shared tree builders and float assertions for scenario and property tests.

use orgrank_core::{NewNode, Node, NodeId, Tree};

/// Relative tolerance for reward comparisons.
pub const EPS: f64 = 1e-9;

/// Whether `a` and `b` agree within [`EPS`], relative to their magnitude.
pub fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPS * a.abs().max(b.abs()).max(1.0)
}

/// Panic with both values unless `a` and `b` are [`close`].
#[track_caller]
pub fn assert_close(a: f64, b: f64) {
    assert!(close(a, b), "expected {b}, got {a}");
}

/// Builds trees with readable, caller-chosen ids.
///
/// Children are attached through the tree mutation layer, so the result
/// always satisfies the parent/child invariant.
pub struct TreeBuilder {
    tree: Tree,
}

impl TreeBuilder {
    /// Start a tree whose root has id and name `id`.
    pub fn root(id: &str, value: f64) -> Self {
        let mut tree = Tree {
            root: Some(NodeId::from(id)),
            ..Tree::default()
        };
        tree.insert(Node::new(NodeId::from(id), id, "", value));
        Self { tree }
    }

    /// Attach `id` (named `id`, no recommender) under `parent`.
    pub fn child(self, parent: &str, id: &str, value: f64) -> Self {
        self.recruit(parent, id, "", value)
    }

    /// Attach `id` under `parent` with the given recommender text.
    pub fn recruit(mut self, parent: &str, id: &str, recommender: &str, value: f64) -> Self {
        self.tree
            .add_child_with_id(
                &NodeId::from(parent),
                NodeId::from(id),
                NewNode::new(id, recommender, value),
            )
            .expect("parent exists and id is fresh");
        self
    }

    pub fn build(self) -> Tree {
        self.tree
    }
}

/// One generated member: index of its parent among earlier members, own
/// value, and recommender text.
#[derive(Debug, Clone)]
pub struct MemberSpec {
    pub parent: usize,
    pub value: f64,
    pub recommender: String,
}

/// Tree of `1 + members.len()` nodes with ids `n0..` and names `m0..`.
///
/// `members[i]` becomes node `i + 1`; its `parent` is clamped to `0..=i`.
pub fn shaped_tree(root_value: f64, members: &[MemberSpec]) -> Tree {
    let mut tree = Tree {
        root: Some(node_id(0)),
        ..Tree::default()
    };
    tree.insert(Node::new(node_id(0), member_name(0), "", root_value));
    for (i, member) in members.iter().enumerate() {
        let parent = member.parent.min(i);
        tree.add_child_with_id(
            &node_id(parent),
            node_id(i + 1),
            NewNode::new(member_name(i + 1), member.recommender.clone(), member.value),
        )
        .expect("parent precedes child");
    }
    tree
}

pub fn node_id(i: usize) -> NodeId {
    NodeId::new(format!("n{i}"))
}

pub fn member_name(i: usize) -> String {
    format!("m{i}")
}

/// Reverse every children list and rotate it by one, changing sibling order
/// without changing the tree's shape.
pub fn permute_siblings(tree: &mut Tree) {
    for node in tree.nodes.values_mut() {
        node.children.reverse();
        if node.children.len() > 1 {
            node.children.rotate_left(1);
        }
    }
}

/// Children of `id`, looked up in `tree`.
pub fn children<'a>(tree: &'a Tree, id: &NodeId) -> impl Iterator<Item = &'a Node> {
    tree.get(id)
        .into_iter()
        .flat_map(|node| node.children.iter())
        .filter_map(|child| tree.get(child))
}
