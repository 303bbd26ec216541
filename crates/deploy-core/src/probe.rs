//! Project probe seam
//!
//! A probe turns a project path into [`ProjectDefinition`] facts. Parsing
//! build manifests is left to the host; [`FactsFileProbe`] reads facts that
//! were already extracted into a JSON file.

use std::fs;
use std::path::Path;

use deploy_meta::ProjectDefinition;

use crate::error::{Error, Result};

/// Supplies facts about a project.
pub trait ProjectProbe: Send + Sync {
    /// # Errors
    ///
    /// Returns `Error::ProjectNotFound` when nothing exists at `path`.
    fn probe(&self, path: &Path) -> Result<ProjectDefinition>;
}

/// Reads a serialized [`ProjectDefinition`] from a JSON file.
///
/// A relative `project_path` inside the file is resolved against the file's
/// directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct FactsFileProbe;

impl ProjectProbe for FactsFileProbe {
    fn probe(&self, path: &Path) -> Result<ProjectDefinition> {
        if !path.is_file() {
            return Err(Error::ProjectNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path)?;
        let mut project: ProjectDefinition = serde_json::from_str(&content)?;
        if project.project_path.is_relative() {
            if let Some(dir) = path.parent() {
                project.project_path = dir.join(&project.project_path);
            }
        }

        tracing::debug!(?path, project = %project.project_name(), "Probed project facts");
        Ok(project)
    }
}
