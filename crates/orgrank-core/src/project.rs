//! Projects: a titled organization tree.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ROOT_NAME, DEFAULT_ROOT_RECOMMENDER};
use crate::error::OrgRankError;
use crate::types::{NodeId, Tree};

/// A named organization tree.
///
/// The tree's `rootNodeId` and `nodes` are flattened into the project so the
/// serialized layout matches exported project files.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: NodeId,
    pub title: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub tree: Tree,
}

impl Project {
    /// A fresh project whose tree holds only the default root.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: NodeId::random(),
            title: title.into(),
            created_at: Utc::now(),
            tree: Tree::with_root(DEFAULT_ROOT_NAME, DEFAULT_ROOT_RECOMMENDER),
        }
    }

    /// Title offered for the `n`-th project (1-based).
    pub fn default_title(n: usize) -> String {
        format!("New team {n}")
    }

    /// Rename the project. Blank titles are ignored.
    ///
    /// Returns whether the title changed.
    pub fn rename(&mut self, title: &str) -> bool {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return false;
        }
        self.title = trimmed.to_string();
        true
    }
}

/// Parse either a single project or a list of projects.
pub fn parse_projects(json: &str) -> Result<Vec<Project>, OrgRankError> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        Many(Vec<Project>),
        One(Box<Project>),
    }

    Ok(match serde_json::from_str::<OneOrMany>(json)? {
        OneOrMany::Many(projects) => projects,
        OneOrMany::One(project) => vec![*project],
    })
}
