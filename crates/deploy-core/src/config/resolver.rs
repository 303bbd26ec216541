//! Configuration resolution with hierarchical merge

use std::fs;
use std::path::{Path, PathBuf};

use super::tool_config::ToolConfig;
use crate::Result;

/// Directory holding project-level configuration.
const PROJECT_CONFIG_DIR: &str = ".deploy";

/// Resolves configuration by merging the global, project and local layers.
pub struct ConfigResolver {
    /// Project root directory
    root: PathBuf,

    /// Override for the global config directory (used for testing).
    /// When `None`, `dirs::config_dir()` is used.
    global_config_dir_override: Option<PathBuf>,
}

impl ConfigResolver {
    /// Create a resolver for the given project root.
    ///
    /// The global layer lives in the platform config directory:
    /// - Linux: `~/.config/deploy-config/`
    /// - macOS: `~/Library/Application Support/deploy-config/`
    /// - Windows: `%APPDATA%\deploy-config\`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            global_config_dir_override: None,
        }
    }

    /// Create a resolver with a custom global config directory.
    pub fn with_global_config_dir(root: impl Into<PathBuf>, global_config_dir: PathBuf) -> Self {
        Self {
            root: root.into(),
            global_config_dir_override: Some(global_config_dir),
        }
    }

    fn global_config_dir(&self) -> Option<PathBuf> {
        if let Some(ref override_dir) = self.global_config_dir_override {
            return Some(override_dir.clone());
        }
        dirs::config_dir().map(|d| d.join("deploy-config"))
    }

    /// Resolve the configuration by merging all layers.
    ///
    /// Missing layers are skipped. Invalid TOML in any layer is an error.
    /// Relative recipe paths in the project layers are resolved against the
    /// project root.
    pub fn resolve(&self) -> Result<ToolConfig> {
        let mut config = ToolConfig::default();

        // Layer 1 - Global defaults
        if let Some(global_dir) = self.global_config_dir() {
            let global_config_path = global_dir.join("config.toml");
            if let Some(global) = load_layer(&global_config_path)? {
                tracing::debug!(?global_config_path, "Loaded global config (layer 1)");
                config.merge(&global);
            }
        }

        // Layer 2 - Project config
        let project_config_path = self.project_config_path();
        if let Some(mut project) = load_layer(&project_config_path)? {
            tracing::debug!(?project_config_path, "Loaded project config (layer 2)");
            self.anchor_recipe_paths(&mut project);
            config.merge(&project);
        }

        // Layer 3 - Local overrides
        let local_config_path = self.local_config_path();
        if let Some(mut local) = load_layer(&local_config_path)? {
            tracing::debug!(?local_config_path, "Loaded local config (layer 3)");
            self.anchor_recipe_paths(&mut local);
            config.merge(&local);
        }

        Ok(config)
    }

    fn anchor_recipe_paths(&self, config: &mut ToolConfig) {
        for path in &mut config.recipe_paths {
            if path.is_relative() {
                *path = self.root.join(&*path);
            }
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn project_config_path(&self) -> PathBuf {
        self.root.join(PROJECT_CONFIG_DIR).join("config.toml")
    }

    fn local_config_path(&self) -> PathBuf {
        self.root.join(PROJECT_CONFIG_DIR).join("config.local.toml")
    }

    /// Check if a project configuration exists
    pub fn has_config(&self) -> bool {
        self.project_config_path().is_file()
    }

    /// Check if local overrides exist
    pub fn has_local_overrides(&self) -> bool {
        self.local_config_path().is_file()
    }
}

fn load_layer(path: &Path) -> Result<Option<ToolConfig>> {
    if !path.is_file() {
        tracing::debug!(?path, "No config layer found, skipping");
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    Ok(Some(ToolConfig::parse(&content)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: PathBuf, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn resolve_returns_defaults_when_no_config_exists() {
        let temp = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        let resolver =
            ConfigResolver::with_global_config_dir(temp.path(), global.path().to_path_buf());

        assert!(!resolver.has_config());
        assert!(!resolver.has_local_overrides());
        assert_eq!(resolver.resolve().unwrap(), ToolConfig::default());
    }

    #[test]
    fn resolve_merges_all_layers_in_order() {
        let temp = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        write(
            global.path().join("config.toml"),
            "[session]\nregion = \"us-east-1\"\naccount_id = \"123\"\n",
        );
        write(
            temp.path().join(".deploy/config.toml"),
            "recipe_paths = [\"recipes\"]\n[session]\nregion = \"eu-west-1\"\n",
        );
        write(
            temp.path().join(".deploy/config.local.toml"),
            "[session]\nregion = \"ap-south-1\"\n",
        );

        let resolver =
            ConfigResolver::with_global_config_dir(temp.path(), global.path().to_path_buf());
        assert!(resolver.has_config());
        assert!(resolver.has_local_overrides());

        let config = resolver.resolve().unwrap();
        assert_eq!(config.session.region.as_deref(), Some("ap-south-1"));
        assert_eq!(config.session.account_id.as_deref(), Some("123"));
        assert_eq!(config.recipe_paths, vec![temp.path().join("recipes")]);
    }

    #[test]
    fn resolve_fails_on_invalid_toml() {
        let temp = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        write(temp.path().join(".deploy/config.toml"), "recipe_paths = [");

        let resolver =
            ConfigResolver::with_global_config_dir(temp.path(), global.path().to_path_buf());
        assert!(resolver.resolve().is_err());
    }
}
