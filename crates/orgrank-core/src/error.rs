//! Error types for orgrank.
//!
//! The metrics engine and reward calculator are infallible; errors only
//! arise in the layers around them (tree mutation, configuration, I/O).
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("node not found: {0}")] NodeNotFound(String),
    #[error("duplicate node id: {0}")] DuplicateId(String),
    #[error("the root node cannot be removed")] CannotRemoveRoot,
    #[error("node has no parent: {0}")] Detached(String),
    #[error("child {child} does not point back at parent {parent}")] ParentMismatch { child: String, parent: String },
    #[error("node not reachable from root: {0}")] Unreachable(String),
    #[error("cycle detected at node {0}")] Cycle(String),
    #[error("tree has no root")] EmptyTree,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid mining rate: {0}")] InvalidMiningRate(String),
}

#[derive(Error, Debug)]
pub enum OrgRankError {
    #[error(transparent)] Tree(#[from] TreeError),
    #[error(transparent)] Config(#[from] ConfigError),
    #[error("serialization: {0}")] Serialization(String),
}

impl From<serde_json::Error> for OrgRankError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
