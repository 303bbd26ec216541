//! Recipe definition types
//!
//! A recipe is a versioned deployment strategy: which service it targets,
//! how the project is bundled, which rules decide whether it applies to a
//! project, and which settings the user can configure before deploying.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::option_setting::{OptionSettingItem, ValidatorBinding};

/// Tool used to perform the deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeploymentType {
    /// Deployed through a generated CDK project.
    CdkProject,
    /// Deployed directly to an existing Elastic Beanstalk environment.
    BeanstalkEnvironment,
    /// Pushed as a container image to an ECR repository.
    ElasticContainerRegistryImage,
}

impl fmt::Display for DeploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeploymentType::CdkProject => write!(f, "CdkProject"),
            DeploymentType::BeanstalkEnvironment => write!(f, "BeanstalkEnvironment"),
            DeploymentType::ElasticContainerRegistryImage => {
                write!(f, "ElasticContainerRegistryImage")
            }
        }
    }
}

/// Shape the project is converted into before deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DeploymentBundleType {
    /// A container image built from a Dockerfile.
    #[default]
    Container,
    /// A zip archive of `dotnet publish` output.
    DotnetPublishZipFile,
}

/// Condition data consumed by a [`RuleTest`].
///
/// Which fields are required depends on the test type; the rule evaluator
/// reports a missing field as a recipe definition error.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RuleCondition {
    pub value: Option<String>,
    pub allowed_values: Vec<String>,
    pub property_name: Option<String>,
    pub file_name: Option<String>,
    #[serde(rename = "NuGetPackageName")]
    pub nuget_package_name: Option<String>,
}

/// A single named test inside a rule item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RuleTest {
    /// Test type, e.g. `MSProjectSdkAttribute` or `FileExists`
    #[serde(rename = "Type")]
    pub test_type: String,
    #[serde(default)]
    pub condition: RuleCondition,
}

/// Effect applied for one outcome of a rule item.
///
/// Both fields are optional so that "no effect" stays distinguishable from
/// an explicit `Include = true` or a zero adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EffectOptions {
    pub include: Option<bool>,
    pub priority_adjustment: Option<i32>,
}

/// Pass and fail effects of a rule item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RuleEffect {
    pub pass: Option<EffectOptions>,
    pub fail: Option<EffectOptions>,
}

impl RuleEffect {
    /// The effect side selected by the combined test outcome.
    pub fn side(&self, passed: bool) -> Option<&EffectOptions> {
        if passed {
            self.pass.as_ref()
        } else {
            self.fail.as_ref()
        }
    }
}

/// One rule item: all tests are ANDed, then the matching effect side applies.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RecommendationRuleItem {
    pub tests: Vec<RuleTest>,
    pub effect: Option<RuleEffect>,
}

/// Deserialized recipe definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecipeDefinition {
    /// Stable id; persisted in other config files and never reused
    pub id: String,
    #[serde(default)]
    pub version: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub target_service: String,
    pub deployment_type: DeploymentType,
    #[serde(default, rename = "DeploymentBundle")]
    pub deployment_bundle_type: DeploymentBundleType,
    /// Origin system recipe of a persisted deployment project
    #[serde(default)]
    pub base_recipe_id: Option<String>,
    #[serde(default)]
    pub recipe_priority: i32,
    #[serde(default)]
    pub persisted_deployment_project: bool,
    #[serde(default)]
    pub recommendation_rules: Vec<RecommendationRuleItem>,
    #[serde(default)]
    pub option_settings: Vec<OptionSettingItem>,
    /// Recipe-level validators evaluated against a whole recommendation
    #[serde(default)]
    pub validators: Vec<ValidatorBinding>,
    /// Location the definition was loaded from, if any
    #[serde(skip)]
    pub recipe_path: Option<PathBuf>,
}

impl RecipeDefinition {
    /// Whether a deployed application created from `recipe_id` can be
    /// redeployed with this recipe.
    ///
    /// Matches the recipe's own id; persisted deployment projects also
    /// match the system recipe they were generated from.
    pub fn matches_recipe_id(&self, recipe_id: &str) -> bool {
        if self.id == recipe_id {
            return true;
        }
        self.persisted_deployment_project && self.base_recipe_id.as_deref() == Some(recipe_id)
    }
}

impl fmt::Display for RecipeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
