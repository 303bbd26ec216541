//! Recommendations: a recipe bound to one project
//!
//! A [`Recommendation`] shares its recipe and project facts through `Arc`
//! and owns only per-session state: the override map keyed by fully
//! qualified setting id and the replacement tokens used when resolving
//! default values.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use deploy_meta::{ProjectDefinition, RecipeDefinition};
use serde_json::Value;

use crate::catalog::Recipe;
use crate::tree::SettingsTree;

/// Project file name without extension. Always registered.
pub const REPLACE_TOKEN_PROJECT_NAME: &str = "{ProjectName}";
pub const REPLACE_TOKEN_STACK_NAME: &str = "{StackName}";
pub const REPLACE_TOKEN_ECR_REPOSITORY_NAME: &str = "{ECRRepositoryName}";
pub const REPLACE_TOKEN_ECR_IMAGE_TAG: &str = "{ECRImageTag}";
pub const REPLACE_TOKEN_DOCKERFILE_PATH: &str = "{DockerfilePath}";
pub const REPLACE_TOKEN_DEFAULT_VPC_ID: &str = "{DefaultVpcId}";
pub const REPLACE_TOKEN_HAS_DEFAULT_VPC: &str = "{HasDefaultVpc}";
pub const REPLACE_TOKEN_LATEST_DOTNET_BEANSTALK_PLATFORM_ARN: &str =
    "{LatestDotnetBeanstalkPlatformArn}";

/// A recipe bound to one project's facts.
#[derive(Debug, Clone)]
pub struct Recommendation {
    recipe: Arc<Recipe>,
    project: Arc<ProjectDefinition>,
    computed_priority: i32,
    overrides: BTreeMap<String, Value>,
    replacement_tokens: BTreeMap<String, String>,
    existing_cloud_application: bool,
}

impl Recommendation {
    /// Create a recommendation with the `{ProjectName}` token registered.
    pub fn new(recipe: Arc<Recipe>, project: Arc<ProjectDefinition>, computed_priority: i32) -> Self {
        let mut replacement_tokens = BTreeMap::new();
        replacement_tokens.insert(
            REPLACE_TOKEN_PROJECT_NAME.to_string(),
            project.project_name(),
        );
        Self {
            recipe,
            project,
            computed_priority,
            overrides: BTreeMap::new(),
            replacement_tokens,
            existing_cloud_application: false,
        }
    }

    /// Register additional replacement tokens.
    ///
    /// `{ProjectName}` cannot be replaced this way.
    pub fn with_replacement_tokens<I, K, V>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (token, value) in tokens {
            self.add_replacement_token(token, value);
        }
        self
    }

    /// Register or update a replacement token.
    pub fn add_replacement_token(&mut self, token: impl Into<String>, value: impl Into<String>) {
        let token = token.into();
        if token == REPLACE_TOKEN_PROJECT_NAME {
            tracing::debug!("Ignoring attempt to replace the project name token");
            return;
        }
        self.replacement_tokens.insert(token, value.into());
    }

    pub fn recipe(&self) -> &Arc<Recipe> {
        &self.recipe
    }

    pub fn definition(&self) -> &RecipeDefinition {
        self.recipe.definition()
    }

    pub fn tree(&self) -> &SettingsTree {
        self.recipe.tree()
    }

    pub fn project(&self) -> &ProjectDefinition {
        &self.project
    }

    pub fn recipe_id(&self) -> &str {
        self.recipe.id()
    }

    pub fn name(&self) -> &str {
        &self.recipe.definition().name
    }

    pub fn computed_priority(&self) -> i32 {
        self.computed_priority
    }

    pub fn replacement_tokens(&self) -> &BTreeMap<String, String> {
        &self.replacement_tokens
    }

    /// Overrides keyed by fully qualified setting id.
    pub fn overrides(&self) -> &BTreeMap<String, Value> {
        &self.overrides
    }

    pub fn override_value(&self, fully_qualified_id: &str) -> Option<&Value> {
        self.overrides.get(fully_qualified_id)
    }

    /// Store an override without validation.
    ///
    /// Callers outside the validator pipeline should only use this for
    /// values that were validated before, such as persisted settings.
    pub fn set_override(&mut self, fully_qualified_id: impl Into<String>, value: Value) {
        self.overrides.insert(fully_qualified_id.into(), value);
    }

    pub fn clear_override(&mut self, fully_qualified_id: &str) -> Option<Value> {
        self.overrides.remove(fully_qualified_id)
    }

    /// Whether this recommendation redeploys an existing cloud application.
    pub fn is_existing_cloud_application(&self) -> bool {
        self.existing_cloud_application
    }

    pub fn set_existing_cloud_application(&mut self, existing: bool) {
        self.existing_cloud_application = existing;
    }

    /// Whether an application deployed with `recipe_id` can be redeployed
    /// with this recommendation.
    pub fn is_compatible_with(&self, recipe_id: &str) -> bool {
        self.definition().matches_recipe_id(recipe_id)
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.definition(), self.computed_priority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::recipe;

    fn recommendation() -> Recommendation {
        let recipe = Arc::new(Recipe::new(recipe("R")).unwrap());
        let project = Arc::new(ProjectDefinition::new("/src/Foo/Foo.csproj"));
        Recommendation::new(recipe, project, 10)
    }

    #[test]
    fn test_project_name_token_is_registered() {
        let rec = recommendation();
        assert_eq!(
            rec.replacement_tokens().get(REPLACE_TOKEN_PROJECT_NAME).map(String::as_str),
            Some("Foo")
        );
    }

    #[test]
    fn test_additional_tokens_cannot_replace_project_name() {
        let rec = recommendation().with_replacement_tokens([
            (REPLACE_TOKEN_STACK_NAME, "foo-stack"),
            (REPLACE_TOKEN_PROJECT_NAME, "Other"),
        ]);
        assert_eq!(rec.replacement_tokens()[REPLACE_TOKEN_STACK_NAME], "foo-stack");
        assert_eq!(rec.replacement_tokens()[REPLACE_TOKEN_PROJECT_NAME], "Foo");
    }

    #[test]
    fn test_overrides_are_per_recommendation() {
        let mut first = recommendation();
        let second = first.clone();
        first.set_override("Name", Value::from("a"));

        assert_eq!(first.override_value("Name"), Some(&Value::from("a")));
        assert_eq!(second.override_value("Name"), None);
        assert_eq!(first.clear_override("Name"), Some(Value::from("a")));
        assert!(first.overrides().is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(recommendation().to_string(), "R (R) [10]");
    }
}
