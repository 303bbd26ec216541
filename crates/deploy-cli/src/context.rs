//! Session setup shared by the commands
//!
//! A session starts from a project facts file. The project directory is the
//! root for configuration lookup, so `.deploy/config.toml` next to the
//! project can add recipe directories, replacement tokens and session facts.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use deploy_core::{
    Catalog, ConfigResolver, FactsFileProbe, ProjectProbe, Recommendation, RecommendationEngine,
    ToolConfig,
};
use deploy_meta::ProjectDefinition;
use serde_json::Value;

use crate::error::{CliError, Result};

/// Everything a command needs to evaluate recipes for one project.
pub struct SessionContext {
    pub project: ProjectDefinition,
    pub config: ToolConfig,
    engine: RecommendationEngine,
}

impl SessionContext {
    /// Probe the project, resolve configuration and load the recipe catalog.
    ///
    /// Recipe directories given on the command line come first, so their
    /// recipes win over configured ones with the same id.
    pub fn load(
        facts: &Path,
        recipe_dirs: &[PathBuf],
        global_config_dir: Option<&Path>,
    ) -> Result<Self> {
        let project = FactsFileProbe.probe(facts)?;
        let root = project.project_directory().to_path_buf();
        let resolver = match global_config_dir {
            Some(dir) => ConfigResolver::with_global_config_dir(root, dir.to_path_buf()),
            None => ConfigResolver::new(root),
        };
        let config = resolver.resolve()?;

        let mut directories: Vec<PathBuf> = recipe_dirs.to_vec();
        for path in &config.recipe_paths {
            if !directories.contains(path) {
                directories.push(path.clone());
            }
        }
        if directories.is_empty() {
            return Err(CliError::user(
                "No recipe directories given. Pass --recipes <DIR> or set recipe_paths in .deploy/config.toml",
            ));
        }

        let catalog = Catalog::load(&directories)?;
        tracing::debug!(recipes = catalog.len(), directories = directories.len(), "Loaded recipe catalog");
        let engine = RecommendationEngine::new(Arc::new(catalog))
            .with_replacement_tokens(config.replacement_tokens.clone());

        Ok(Self {
            project,
            config,
            engine,
        })
    }

    /// Ranked recommendations for the project.
    pub fn recommendations(&self) -> Result<Vec<Recommendation>> {
        Ok(self
            .engine
            .compute_recommendations(&self.project, &self.config.session_facts())?)
    }

    /// The recommendation for `recipe_id`, with persisted settings applied.
    pub fn recommendation(&self, recipe_id: &str, previous: Option<&Path>) -> Result<Recommendation> {
        let mut recommendation = self
            .recommendations()?
            .into_iter()
            .find(|recommendation| recommendation.recipe_id() == recipe_id)
            .ok_or_else(|| match self.engine.catalog().get(recipe_id) {
                Some(_) => CliError::user(format!(
                    "Recipe '{recipe_id}' is not compatible with project '{}'",
                    self.project.project_name()
                )),
                None => CliError::user(format!("Unknown recipe '{recipe_id}'")),
            })?;

        if let Some(path) = previous {
            let content = fs::read_to_string(path)?;
            let Value::Object(settings) = serde_json::from_str(&content)? else {
                return Err(CliError::user(format!(
                    "Previous settings in {} must be a JSON object",
                    path.display()
                )));
            };
            let applied = recommendation.apply_previous_settings(&settings);
            tracing::info!(path = %path.display(), applied, "Applied previous settings");
        }
        Ok(recommendation)
    }
}
