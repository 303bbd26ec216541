//! Tool configuration schema and merge rules

use std::collections::BTreeMap;
use std::path::PathBuf;

use deploy_meta::DeploymentType;
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::session::SessionFacts;

/// Session defaults. Every field is optional so a layer only overrides what
/// it sets.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    pub region: Option<String>,
    pub account_id: Option<String>,
    pub docker_available: Option<bool>,
    pub supported_deployment_types: Option<Vec<DeploymentType>>,
}

/// Parsed `config.toml` of one layer, or the merge of several layers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Extra directories with custom `*.recipe` files
    pub recipe_paths: Vec<PathBuf>,
    /// Tokens registered on every recommendation, e.g. `"{StackName}"`
    pub replacement_tokens: BTreeMap<String, String>,
    pub session: SessionSection,
}

impl ToolConfig {
    /// Parse a configuration layer from TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match
    /// the schema.
    pub fn parse(content: &str) -> Result<Self> {
        let config: ToolConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Merge another layer into this one. `other` takes precedence.
    ///
    /// - `recipe_paths`: extended with paths not already present
    /// - `replacement_tokens`: merged key-wise
    /// - `session`: each field set in `other` replaces this one's
    pub fn merge(&mut self, other: &ToolConfig) {
        for path in &other.recipe_paths {
            if !self.recipe_paths.contains(path) {
                self.recipe_paths.push(path.clone());
            }
        }

        for (token, value) in &other.replacement_tokens {
            self.replacement_tokens.insert(token.clone(), value.clone());
        }

        let session = &other.session;
        if session.region.is_some() {
            self.session.region = session.region.clone();
        }
        if session.account_id.is_some() {
            self.session.account_id = session.account_id.clone();
        }
        if session.docker_available.is_some() {
            self.session.docker_available = session.docker_available;
        }
        if session.supported_deployment_types.is_some() {
            self.session.supported_deployment_types = session.supported_deployment_types.clone();
        }
    }

    /// Session facts described by this configuration.
    pub fn session_facts(&self) -> SessionFacts {
        SessionFacts {
            region: self.session.region.clone(),
            account_id: self.session.account_id.clone(),
            docker_available: self.session.docker_available.unwrap_or(false),
            supported_deployment_types: self.session.supported_deployment_types.clone(),
        }
    }
}
