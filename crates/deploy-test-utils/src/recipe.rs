//! Builders for recipe definitions and option settings.

use std::sync::Arc;

use deploy_core::{Recipe, Recommendation};
use deploy_meta::{
    DependencyOperation, DeploymentType, EffectOptions, OptionSettingItem, OptionSettingValueType,
    ProjectDefinition, PropertyDependency, RecipeDefinition, RecommendationRuleItem, RuleCondition,
    RuleEffect, RuleTest, ValidatorBinding,
};
use serde_json::Value;

/// Builder for a [`RecipeDefinition`].
///
/// # Example
///
/// ```rust
/// use deploy_test_utils::{RecipeBuilder, SettingBuilder};
///
/// let recipe = RecipeBuilder::new("Web")
///     .priority(100)
///     .requires_sdk("Microsoft.NET.Sdk.Web")
///     .setting(SettingBuilder::string("StackName").default("{ProjectName}"))
///     .build();
/// assert_eq!(recipe.option_settings.len(), 1);
/// ```
pub struct RecipeBuilder {
    recipe: RecipeDefinition,
}

impl RecipeBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            recipe: RecipeDefinition {
                id: id.to_string(),
                version: "1.0.0".to_string(),
                name: id.to_string(),
                description: String::new(),
                target_service: String::new(),
                deployment_type: DeploymentType::CdkProject,
                deployment_bundle_type: Default::default(),
                base_recipe_id: None,
                recipe_priority: 0,
                persisted_deployment_project: false,
                recommendation_rules: Vec::new(),
                option_settings: Vec::new(),
                validators: Vec::new(),
                recipe_path: None,
            },
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.recipe.name = name.to_string();
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.recipe.recipe_priority = priority;
        self
    }

    pub fn deployment_type(mut self, deployment_type: DeploymentType) -> Self {
        self.recipe.deployment_type = deployment_type;
        self
    }

    /// Mark as a persisted deployment project generated from `base_recipe_id`.
    pub fn persisted_from(mut self, base_recipe_id: &str) -> Self {
        self.recipe.persisted_deployment_project = true;
        self.recipe.base_recipe_id = Some(base_recipe_id.to_string());
        self
    }

    /// Exclude the recipe unless the project's SDK matches.
    pub fn requires_sdk(self, sdk: &str) -> Self {
        self.rule(
            vec![sdk_test(sdk)],
            None,
            Some(EffectOptions {
                include: Some(false),
                priority_adjustment: None,
            }),
        )
    }

    /// Adjust priority when the project's SDK matches, keeping the recipe
    /// either way.
    pub fn adjust_when_sdk(self, sdk: &str, adjustment: i32) -> Self {
        self.rule(
            vec![sdk_test(sdk)],
            Some(EffectOptions {
                include: None,
                priority_adjustment: Some(adjustment),
            }),
            Some(EffectOptions {
                include: Some(true),
                priority_adjustment: None,
            }),
        )
    }

    pub fn rule(
        mut self,
        tests: Vec<RuleTest>,
        pass: Option<EffectOptions>,
        fail: Option<EffectOptions>,
    ) -> Self {
        self.recipe.recommendation_rules.push(RecommendationRuleItem {
            tests,
            effect: Some(RuleEffect { pass, fail }),
        });
        self
    }

    pub fn setting(mut self, setting: SettingBuilder) -> Self {
        self.recipe.option_settings.push(setting.build());
        self
    }

    pub fn validator(mut self, validator_type: &str, configuration: Option<Value>) -> Self {
        self.recipe
            .validators
            .push(binding(validator_type, configuration));
        self
    }

    pub fn build(self) -> RecipeDefinition {
        self.recipe
    }

    /// Bind the recipe to a project with a zero priority, skipping rule
    /// evaluation.
    ///
    /// # Panics
    ///
    /// Panics if the settings tree cannot be built.
    pub fn recommend(self, project: &ProjectDefinition) -> Recommendation {
        let recipe = Recipe::new(self.recipe).expect("recipe settings should form a valid tree");
        Recommendation::new(Arc::new(recipe), Arc::new(project.clone()), 0)
    }
}

/// An `MSProjectSdkAttribute` rule test.
pub fn sdk_test(sdk: &str) -> RuleTest {
    RuleTest {
        test_type: "MSProjectSdkAttribute".to_string(),
        condition: RuleCondition {
            value: Some(sdk.to_string()),
            ..Default::default()
        },
    }
}

/// Builder for an [`OptionSettingItem`].
pub struct SettingBuilder {
    item: OptionSettingItem,
}

impl SettingBuilder {
    pub fn new(id: &str, value_type: OptionSettingValueType) -> Self {
        Self {
            item: OptionSettingItem::new(id, value_type),
        }
    }

    pub fn string(id: &str) -> Self {
        Self::new(id, OptionSettingValueType::String)
    }

    pub fn int(id: &str) -> Self {
        Self::new(id, OptionSettingValueType::Int)
    }

    pub fn bool(id: &str) -> Self {
        Self::new(id, OptionSettingValueType::Bool)
    }

    pub fn list(id: &str) -> Self {
        Self::new(id, OptionSettingValueType::List)
    }

    pub fn object(id: &str) -> Self {
        Self::new(id, OptionSettingValueType::Object)
    }

    pub fn double(id: &str) -> Self {
        Self::new(id, OptionSettingValueType::Double)
    }

    /// Display name, used in validation messages.
    pub fn name(mut self, name: &str) -> Self {
        self.item.name = name.to_string();
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.item.default_value = Some(value.into());
        self
    }

    pub fn updatable(mut self, updatable: bool) -> Self {
        self.item.updatable = updatable;
        self
    }

    pub fn child(mut self, child: SettingBuilder) -> Self {
        self.item.child_option_settings.push(child.build());
        self
    }

    /// Visible only while `id` equals `value`.
    pub fn depends_on(mut self, id: &str, value: impl Into<Value>) -> Self {
        self.item.depends_on.push(PropertyDependency {
            id: id.to_string(),
            value: Some(value.into()),
            operation: None,
        });
        self
    }

    /// Visible only while `id` holds a non-empty value.
    pub fn depends_on_not_empty(mut self, id: &str) -> Self {
        self.item.depends_on.push(PropertyDependency {
            id: id.to_string(),
            value: None,
            operation: Some(DependencyOperation::NotEmpty),
        });
        self
    }

    pub fn validator(mut self, validator_type: &str, configuration: Option<Value>) -> Self {
        self.item
            .validators
            .push(binding(validator_type, configuration));
        self
    }

    pub fn build(self) -> OptionSettingItem {
        self.item
    }
}

fn binding(validator_type: &str, configuration: Option<Value>) -> ValidatorBinding {
    let binding = ValidatorBinding::new(validator_type);
    match configuration {
        Some(configuration) => binding.with_configuration(configuration),
        None => binding,
    }
}
