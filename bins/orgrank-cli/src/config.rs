//! CLI configuration: command-line flags, then environment, then defaults.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use orgrank_core::project::parse_projects;
use orgrank_core::{MiningRate, Project, TreeError};
use tracing::{debug, info, warn};

/// Environment variable naming the project file.
pub const PROJECT_ENV: &str = "ORGRANK_PROJECT";

/// Environment variable holding the mining rate (`0.008` or `0.8%`).
pub const MINING_RATE_ENV: &str = "ORGRANK_MINING_RATE";

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Project file: one exported project or a list of them.
    pub project_path: PathBuf,
    /// Mining rate applied to every reward.
    pub mining_rate: MiningRate,
}

impl Config {
    /// Resolve configuration from flags and the process environment.
    pub fn from_env(project: Option<PathBuf>, rate: Option<MiningRate>) -> Result<Self> {
        Self::resolve(project, rate, |key| std::env::var(key).ok())
    }

    /// Resolve configuration with an explicit environment lookup.
    pub fn resolve(
        project: Option<PathBuf>,
        rate: Option<MiningRate>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let project_path = match project {
            Some(path) => path,
            None => env(PROJECT_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(default_project_path),
        };

        let mining_rate = match rate {
            Some(rate) => rate,
            None => match env(MINING_RATE_ENV) {
                Some(raw) => raw
                    .parse()
                    .with_context(|| format!("{MINING_RATE_ENV} must be a rate like 0.008 or 0.8%"))?,
                None => MiningRate::default(),
            },
        };

        Ok(Config {
            project_path,
            mining_rate,
        })
    }
}

/// `~/.orgrank/project.json`.
pub fn default_project_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".orgrank")
        .join("project.json")
}

/// Read every project stored in `path`.
pub fn load_projects(path: &Path) -> Result<Vec<Project>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read project file: {}", path.display()))?;
    let projects = parse_projects(&raw)
        .with_context(|| format!("Invalid project file: {}", path.display()))?;
    debug!(path = %path.display(), projects = projects.len(), "project file loaded");
    Ok(projects)
}

/// Pick a project by id or title; the first one when `selector` is `None`.
pub fn select_project(projects: Vec<Project>, selector: Option<&str>) -> Result<Project> {
    let Some(selector) = selector else {
        return match projects.into_iter().next() {
            Some(project) => Ok(project),
            None => bail!("Project file contains no projects"),
        };
    };

    let wanted = selector.trim();
    let found = projects
        .into_iter()
        .find(|p| p.id.as_str() == wanted || p.title.eq_ignore_ascii_case(wanted));
    match found {
        Some(project) => {
            info!(id = %project.id, title = %project.title, "project selected");
            Ok(project)
        }
        None => bail!("No project with id or title {wanted:?}"),
    }
}

/// Refuse trees the metrics pass cannot walk.
///
/// A cycle, or a child listed under a parent it does not point back at,
/// would send the traversal round the same nodes forever. Orphans, a
/// missing root, and dangling child ids are only logged: the engine skips
/// them.
pub fn ensure_computable(project: &Project) -> Result<()> {
    match project.tree.check_integrity() {
        Ok(()) => Ok(()),
        Err(e @ (TreeError::Cycle(_) | TreeError::ParentMismatch { .. })) => {
            bail!("Project {:?} is not a tree: {e}", project.title)
        }
        Err(e) => {
            warn!(project = %project.title, "tree is inconsistent: {e}");
            Ok(())
        }
    }
}
