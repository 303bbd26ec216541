//! Built-in validators
//!
//! Option-setting validators are one closed enum, [`OptionSettingValidator`],
//! with one variant per kind; recipe-level validators are
//! [`RecipeValidator`]. Both are built from recipe data by
//! [`crate::factory`].
//!
//! Validator kinds come in two shapes:
//!
//! - value-only kinds look at the proposed value alone ([`value`])
//! - contextual kinds also read the recommendation and the target setting
//!   ([`contextual`]) or query cloud inventory ([`cloud`])

pub mod cloud;
pub mod contextual;
pub mod recipe;
pub mod value;

use deploy_core::{Recommendation, SettingNode};
use serde_json::Value;

use crate::context::ValidationContext;
use crate::error::Result;
use crate::result::ValidationResult;

pub use cloud::{
    ExistingResourceValidator, InstanceTypeValidator, SecurityGroupsInVpcValidator,
    SubnetsInVpcValidator, VpcExistsValidator, VpcSubnetsInDifferentAzsValidator,
};
pub use contextual::{
    ComparisonOperation, ComparisonValidator, DirectoryExistsValidator, FileExistsValidator,
};
pub use recipe::{
    FargateTaskSizeCpuMemoryLimitsValidator, MinMaxConstraintValidator,
    ValidDockerfilePathValidator,
};
pub use value::{
    DockerBuildArgsValidator, DotnetPublishArgsValidator, RangeValidator, RegexValidator,
    RequiredValidator, StringLengthValidator, UriValidator,
};

/// A validator bound to one option setting.
#[derive(Debug, Clone)]
pub enum OptionSettingValidator {
    Required(RequiredValidator),
    Regex(RegexValidator),
    Range(RangeValidator),
    StringLength(StringLengthValidator),
    Uri(UriValidator),
    DockerBuildArgs(DockerBuildArgsValidator),
    DotnetPublishArgs(DotnetPublishArgsValidator),
    Comparison(ComparisonValidator),
    FileExists(FileExistsValidator),
    DirectoryExists(DirectoryExistsValidator),
    ExistingResource(ExistingResourceValidator),
    VpcExists(VpcExistsValidator),
    SubnetsInVpc(SubnetsInVpcValidator),
    SecurityGroupsInVpc(SecurityGroupsInVpcValidator),
    InstanceType(InstanceTypeValidator),
    VpcSubnetsInDifferentAzs(VpcSubnetsInDifferentAzsValidator),
}

impl OptionSettingValidator {
    /// The tag this validator is bound with in recipe files.
    pub fn kind(&self) -> &'static str {
        match self {
            OptionSettingValidator::Required(_) => "Required",
            OptionSettingValidator::Regex(_) => "Regex",
            OptionSettingValidator::Range(_) => "Range",
            OptionSettingValidator::StringLength(_) => "StringLength",
            OptionSettingValidator::Uri(_) => "Uri",
            OptionSettingValidator::DockerBuildArgs(_) => "DockerBuildArgs",
            OptionSettingValidator::DotnetPublishArgs(_) => "DotnetPublishArgs",
            OptionSettingValidator::Comparison(_) => "Comparison",
            OptionSettingValidator::FileExists(_) => "FileExists",
            OptionSettingValidator::DirectoryExists(_) => "DirectoryExists",
            OptionSettingValidator::ExistingResource(_) => "ExistingResource",
            OptionSettingValidator::VpcExists(_) => "VpcExists",
            OptionSettingValidator::SubnetsInVpc(_) => "SubnetsInVpc",
            OptionSettingValidator::SecurityGroupsInVpc(_) => "SecurityGroupsInVpc",
            OptionSettingValidator::InstanceType(_) => "InstanceType",
            OptionSettingValidator::VpcSubnetsInDifferentAzs(_) => "VPCSubnetsInDifferentAZs",
        }
    }

    /// Whether running this validator queries cloud inventory.
    pub fn queries_cloud(&self) -> bool {
        matches!(
            self,
            OptionSettingValidator::ExistingResource(_)
                | OptionSettingValidator::VpcExists(_)
                | OptionSettingValidator::SubnetsInVpc(_)
                | OptionSettingValidator::SecurityGroupsInVpc(_)
                | OptionSettingValidator::InstanceType(_)
                | OptionSettingValidator::VpcSubnetsInDifferentAzs(_)
        )
    }

    /// Run the validator against a proposed value.
    ///
    /// # Errors
    ///
    /// Fails only on misconfiguration, a failed resource query or
    /// cancellation. A rejected value is an `Ok` failed result.
    pub async fn validate(&self, input: &Value, ctx: &ValidationContext<'_>) -> Result<ValidationResult> {
        match self {
            OptionSettingValidator::Required(v) => Ok(v.validate(input, display_name(ctx.setting))),
            OptionSettingValidator::Regex(v) => Ok(v.validate(input)),
            OptionSettingValidator::Range(v) => Ok(v.validate(input)),
            OptionSettingValidator::StringLength(v) => Ok(v.validate(input)),
            OptionSettingValidator::Uri(v) => Ok(v.validate(input)),
            OptionSettingValidator::DockerBuildArgs(v) => Ok(v.validate(input)),
            OptionSettingValidator::DotnetPublishArgs(v) => Ok(v.validate(input)),
            OptionSettingValidator::Comparison(v) => v.validate(input, ctx),
            OptionSettingValidator::FileExists(v) => Ok(v.validate(input, ctx)),
            OptionSettingValidator::DirectoryExists(v) => Ok(v.validate(input, ctx)),
            OptionSettingValidator::ExistingResource(v) => v.validate(input, ctx).await,
            OptionSettingValidator::VpcExists(v) => v.validate(input, ctx).await,
            OptionSettingValidator::SubnetsInVpc(v) => v.validate(input, ctx).await,
            OptionSettingValidator::SecurityGroupsInVpc(v) => v.validate(input, ctx).await,
            OptionSettingValidator::InstanceType(v) => v.validate(input, ctx).await,
            OptionSettingValidator::VpcSubnetsInDifferentAzs(v) => v.validate(input, ctx).await,
        }
    }
}

/// A validator bound to a recipe, run against the whole recommendation.
#[derive(Debug, Clone)]
pub enum RecipeValidator {
    FargateTaskSizeCpuMemoryLimits(FargateTaskSizeCpuMemoryLimitsValidator),
    MinMaxConstraint(MinMaxConstraintValidator),
    ValidDockerfilePath(ValidDockerfilePathValidator),
}

impl RecipeValidator {
    pub fn kind(&self) -> &'static str {
        match self {
            RecipeValidator::FargateTaskSizeCpuMemoryLimits(_) => "FargateTaskSizeCpuMemoryLimits",
            RecipeValidator::MinMaxConstraint(_) => "MinMaxConstraint",
            RecipeValidator::ValidDockerfilePath(_) => "ValidDockerfilePath",
        }
    }

    pub fn validate(&self, recommendation: &Recommendation) -> Result<ValidationResult> {
        match self {
            RecipeValidator::FargateTaskSizeCpuMemoryLimits(v) => v.validate(recommendation),
            RecipeValidator::MinMaxConstraint(v) => v.validate(recommendation),
            RecipeValidator::ValidDockerfilePath(v) => v.validate(recommendation),
        }
    }
}

/// Setting name for messages, falling back to its id.
pub(crate) fn display_name(setting: &SettingNode) -> &str {
    if setting.item.name.is_empty() {
        setting.id()
    } else {
        &setting.item.name
    }
}

/// Text form of a proposed value. Null is empty; lists and objects render
/// as JSON.
pub(crate) fn input_text(input: &Value) -> String {
    match input {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// A proposed value as a list of strings, if it is list-shaped.
///
/// Accepts a JSON array or a string holding one, the form front-ends send
/// list settings in.
pub(crate) fn input_list(input: &Value) -> Option<Vec<String>> {
    match input {
        Value::Array(items) => Some(items.iter().map(input_text).collect()),
        Value::String(text) if text.trim_start().starts_with('[') => {
            serde_json::from_str::<Vec<String>>(text).ok()
        }
        _ => None,
    }
}
