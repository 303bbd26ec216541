//! Error types for deploy-core

use std::path::PathBuf;

/// Result type for deploy-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in deploy-core operations
///
/// Every variant is fatal: it points at a broken recipe definition, a
/// misused API or a failing collaborator, never at a bad user value.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Two recipes in one catalog share an id
    #[error("Duplicate recipe id: {id}")]
    DuplicateRecipeId { id: String },

    /// Two settings in one recipe resolve to the same fully qualified id
    #[error("Duplicate option setting '{id}' in recipe {recipe_id}")]
    DuplicateSettingId { recipe_id: String, id: String },

    /// A `DependsOn` entry references a setting the recipe does not define
    #[error("Option setting '{setting_id}' in recipe {recipe_id} depends on unknown setting '{depends_on}'")]
    DependencyNotFound {
        recipe_id: String,
        setting_id: String,
        depends_on: String,
    },

    /// A rule test type that no evaluator implements
    #[error("Invalid test type [{test_type}] found in rule of recipe {recipe_id}")]
    UnknownRuleTest { recipe_id: String, test_type: String },

    /// A rule test is missing a condition field it requires
    #[error("Rule test {test_type} in recipe {recipe_id} is missing the condition '{field}'")]
    MissingRuleCondition {
        recipe_id: String,
        test_type: String,
        field: &'static str,
    },

    /// Lookup of a setting by fully qualified id failed
    #[error("The Option Setting Item {id} does not exist as part of the {recipe} recipe")]
    OptionSettingNotFound { recipe: String, id: String },

    /// The project probe could not find the project
    #[error("Project not found at {path}")]
    ProjectNotFound { path: PathBuf },

    /// Metadata error from deploy-meta
    #[error(transparent)]
    Meta(#[from] deploy_meta::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}
