//! # orgrank-core
//! Foundation types, constants, and the tree mutation layer for orgrank.

pub mod constants;
pub mod error;
pub mod project;
pub mod rate;
pub mod traits;
pub mod tree;
pub mod types;

pub use error::{ConfigError, OrgRankError, TreeError};
pub use project::Project;
pub use rate::MiningRate;
pub use traits::RankClassifier;
pub use tree::{NewNode, NodeUpdate};
pub use types::{MetricsMap, Node, NodeId, NodeMetrics, Rank, RewardEntry, RewardReport, Tree};
