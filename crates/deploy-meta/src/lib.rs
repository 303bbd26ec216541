//! Recipe metadata for deploy-config.
//!
//! This crate holds the deserialized shape of deployment recipes: the
//! recommendation rules, the option setting tree and the validator bindings,
//! together with the project facts the rule engine is evaluated against.
//! It has no behaviour beyond loading and simple lookups.

pub mod error;
pub mod loader;
pub mod option_setting;
pub mod project;
pub mod recipe;

pub use error::{Error, Result};
pub use loader::{RECIPE_FILE_EXTENSION, load_recipe_definitions, parse_recipe};
pub use option_setting::{
    DependencyOperation, OptionSettingItem, OptionSettingValueType, PropertyDependency, TypeHint,
    ValidatorBinding,
};
pub use project::ProjectDefinition;
pub use recipe::{
    DeploymentBundleType, DeploymentType, EffectOptions, RecipeDefinition, RecommendationRuleItem,
    RuleCondition, RuleEffect, RuleTest,
};
