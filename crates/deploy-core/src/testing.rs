//! Recipe fixtures for unit tests

use deploy_meta::{
    DeploymentType, EffectOptions, OptionSettingItem, OptionSettingValueType, PropertyDependency,
    RecipeDefinition, RecommendationRuleItem, RuleCondition, RuleEffect, RuleTest,
};
use serde_json::Value;

pub fn recipe(id: &str) -> RecipeDefinition {
    RecipeDefinition {
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
    }
}

pub fn setting(id: &str, value_type: OptionSettingValueType) -> OptionSettingItem {
    OptionSettingItem::new(id, value_type)
}

pub fn with_default(mut item: OptionSettingItem, value: Value) -> OptionSettingItem {
    item.default_value = Some(value);
    item
}

pub fn depends_on(mut item: OptionSettingItem, id: &str, value: Value) -> OptionSettingItem {
    item.depends_on.push(PropertyDependency {
        id: id.to_string(),
        value: Some(value),
        operation: None,
    });
    item
}

pub fn object(id: &str, children: Vec<OptionSettingItem>) -> OptionSettingItem {
    let mut item = OptionSettingItem::new(id, OptionSettingValueType::Object);
    item.child_option_settings = children;
    item
}

pub fn test(test_type: &str, condition: RuleCondition) -> RuleTest {
    RuleTest {
        test_type: test_type.to_string(),
        condition,
    }
}

pub fn sdk_is(value: &str) -> RuleTest {
    test(
        "MSProjectSdkAttribute",
        RuleCondition {
            value: Some(value.to_string()),
            ..Default::default()
        },
    )
}

pub fn rule(
    tests: Vec<RuleTest>,
    pass: Option<EffectOptions>,
    fail: Option<EffectOptions>,
) -> RecommendationRuleItem {
    RecommendationRuleItem {
        tests,
        effect: Some(RuleEffect { pass, fail }),
    }
}

pub fn adjust(priority_adjustment: i32) -> Option<EffectOptions> {
    Some(EffectOptions {
        include: None,
        priority_adjustment: Some(priority_adjustment),
    })
}

pub fn include(include: bool) -> Option<EffectOptions> {
    Some(EffectOptions {
        include: Some(include),
        priority_adjustment: None,
    })
}
