//! Core data types: nodes, trees, ranks, metrics, and reward entries.
//!
//! All monetary values are `f64`. Rounding happens only at presentation.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::ID_BYTES;

/// Opaque unique key of a node (or project).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A fresh id made of [`ID_BYTES`] random bytes, hex encoded.
    pub fn random() -> Self {
        let bytes: [u8; ID_BYTES] = rand::random();
        Self(hex::encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Coerce an arbitrary JSON scalar into a node value.
///
/// Numbers pass through, numeric strings are parsed, booleans become 1/0,
/// and everything else (null, non-numeric text, arrays, objects) is 0.
pub fn coerce_value(raw: &serde_json::Value) -> f64 {
    match raw {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return 0.0;
            }
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|v| !v.is_nan())
                .unwrap_or(0.0)
        }
        serde_json::Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

fn deserialize_value<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().map(coerce_value).unwrap_or(0.0))
}

/// A single member of the organization tree.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    /// Free text naming the member who recruited this one. Matched against
    /// display names, never against ids.
    #[serde(rename = "employeeId", alias = "recommender", default)]
    pub recommender: String,
    #[serde(default, deserialize_with = "deserialize_value")]
    pub value: f64,
    #[serde(default)]
    pub children: Vec<NodeId>,
    #[serde(default)]
    pub parent_id: Option<NodeId>,
}

impl Node {
    pub fn new(id: NodeId, name: impl Into<String>, recommender: impl Into<String>, value: f64) -> Self {
        Self {
            id,
            name: name.into(),
            recommender: recommender.into(),
            value,
            children: Vec::new(),
            parent_id: None,
        }
    }

    /// The value that takes part in sums. NaN counts as 0.
    pub fn own_value(&self) -> f64 {
        if self.value.is_nan() {
            0.0
        } else {
            self.value
        }
    }

    /// Whether the value should be shown as unset.
    pub fn is_unset(&self) -> bool {
        self.own_value() == 0.0
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena of nodes keyed by id, plus the designated root.
///
/// Serialized with the reference field names (`rootNodeId`, `nodes`) so
/// project exports load unchanged.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Tree {
    #[serde(rename = "rootNodeId", default)]
    pub root: Option<NodeId>,
    #[serde(default)]
    pub nodes: BTreeMap<NodeId, Node>,
}

impl Tree {
    pub fn get(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// The root node, if one is designated and present.
    pub fn root_node(&self) -> Option<&Node> {
        self.root.as_ref().and_then(|id| self.nodes.get(id))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Insert a node as-is, replacing any node with the same id.
    ///
    /// No links are maintained; callers building trees by hand must keep
    /// `children` and `parent_id` consistent themselves.
    pub fn insert(&mut self, node: Node) -> Option<Node> {
        self.nodes.insert(node.id.clone(), node)
    }
}

/// Rank tier, S1 (lowest) to S8 (highest).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Rank {
    S1 = 1,
    S2 = 2,
    S3 = 3,
    S4 = 4,
    S5 = 5,
    S6 = 6,
    S7 = 7,
    S8 = 8,
}

impl Rank {
    pub const ALL: [Rank; 8] = [
        Rank::S1,
        Rank::S2,
        Rank::S3,
        Rank::S4,
        Rank::S5,
        Rank::S6,
        Rank::S7,
        Rank::S8,
    ];

    /// Numeric level, 1 for S1 through 8 for S8.
    pub fn level(self) -> u8 {
        self as u8
    }

    /// Community reward multiplier (the tier's numeric suffix).
    pub fn multiplier(self) -> f64 {
        f64::from(self.level())
    }

    pub fn from_level(level: u8) -> Option<Rank> {
        Self::ALL.get(usize::from(level).checked_sub(1)?).copied()
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.level())
    }
}

impl FromStr for Rank {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .trim()
            .strip_prefix(['S', 's'])
            .ok_or_else(|| format!("not a rank: {s}"))?;
        let level: u8 = digits.parse().map_err(|_| format!("not a rank: {s}"))?;
        Rank::from_level(level).ok_or_else(|| format!("rank out of range: {s}"))
    }
}

/// Derived metrics of one node. Never mutated after computation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NodeMetrics {
    /// Distance from the root (root = 0).
    pub level: u32,
    /// Sum of every descendant's own value.
    pub children_total_value: f64,
    /// Own value plus `children_total_value`.
    pub total_with_self: f64,
    pub rank: Option<Rank>,
    /// Highest rank level (0–8) held by this node or any descendant.
    pub max_rank_in_subtree: u8,
}

impl NodeMetrics {
    pub fn rank_level(&self) -> u8 {
        self.rank.map_or(0, Rank::level)
    }

    pub fn rank_multiplier(&self) -> f64 {
        self.rank.map_or(0.0, Rank::multiplier)
    }
}

/// Metrics keyed by node id, covering the nodes reachable from the root.
pub type MetricsMap = HashMap<NodeId, NodeMetrics>;

/// Reward breakdown for one node.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RewardEntry {
    pub id: NodeId,
    pub recommender: String,
    pub name: String,
    pub level: u32,
    pub rank: Option<Rank>,
    pub mining: f64,
    pub referral: f64,
    pub community: f64,
    pub total: f64,
}

/// Per-node rewards ordered by level (root first) and their grand total.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RewardReport {
    pub entries: Vec<RewardEntry>,
    pub grand_total: f64,
}

impl RewardReport {
    pub fn entry(&self, id: &NodeId) -> Option<&RewardEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
