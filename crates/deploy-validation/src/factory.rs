//! Validator factory
//!
//! Turns `(ValidatorType, Configuration)` bindings from recipe data into
//! typed validators. Configuration keys are PascalCase and optional; a
//! missing payload means "all defaults". Bindings are checked eagerly, so a
//! validator that needs a configuration value it was not given fails here
//! rather than on first use.

use deploy_meta::{OptionSettingItem, RecipeDefinition, ValidatorBinding};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::validators::{OptionSettingValidator, RecipeValidator};

fn configuration<T: DeserializeOwned>(binding: &ValidatorBinding) -> Result<T> {
    let payload = match &binding.configuration {
        None | Some(Value::Null) => Value::Object(Map::new()),
        Some(payload) => payload.clone(),
    };
    serde_json::from_value(payload).map_err(|err| Error::InvalidValidatorConfiguration {
        validator_type: binding.validator_type.clone(),
        message: err.to_string(),
    })
}

/// Build the validator for one option-setting binding.
///
/// # Errors
///
/// `UnknownValidatorType` for an unrecognized tag,
/// `InvalidValidatorConfiguration` for a payload of the wrong shape and
/// `MissingValidatorConfiguration` when a required key is absent.
pub fn build_option_validator(binding: &ValidatorBinding) -> Result<OptionSettingValidator> {
    use OptionSettingValidator as V;

    let validator = match binding.validator_type.as_str() {
        "Required" => V::Required(configuration(binding)?),
        "Regex" => V::Regex(configuration(binding)?),
        "Range" => V::Range(configuration(binding)?),
        "StringLength" => V::StringLength(configuration(binding)?),
        "Uri" => V::Uri(configuration(binding)?),
        "DockerBuildArgs" => V::DockerBuildArgs(configuration(binding)?),
        "DotnetPublishArgs" => V::DotnetPublishArgs(configuration(binding)?),
        "Comparison" => {
            let validator: crate::validators::ComparisonValidator = configuration(binding)?;
            validator.configured()?;
            V::Comparison(validator)
        }
        "FileExists" => V::FileExists(configuration(binding)?),
        "DirectoryExists" => V::DirectoryExists(configuration(binding)?),
        "ExistingResource" => {
            let validator: crate::validators::ExistingResourceValidator = configuration(binding)?;
            validator.configured()?;
            V::ExistingResource(validator)
        }
        "VpcExists" => V::VpcExists(configuration(binding)?),
        "SubnetsInVpc" => {
            let validator: crate::validators::SubnetsInVpcValidator = configuration(binding)?;
            validator.configured()?;
            V::SubnetsInVpc(validator)
        }
        "SecurityGroupsInVpc" => {
            let validator: crate::validators::SecurityGroupsInVpcValidator = configuration(binding)?;
            validator.configured()?;
            V::SecurityGroupsInVpc(validator)
        }
        "InstanceType" => V::InstanceType(configuration(binding)?),
        "VPCSubnetsInDifferentAZs" => V::VpcSubnetsInDifferentAzs(configuration(binding)?),
        other => {
            return Err(Error::UnknownValidatorType {
                validator_type: other.to_string(),
            });
        }
    };
    Ok(validator)
}

/// Build every validator bound to a setting, in declared order.
pub fn build_option_validators(setting: &OptionSettingItem) -> Result<Vec<OptionSettingValidator>> {
    setting
        .validators
        .iter()
        .map(build_option_validator)
        .collect()
}

/// Build the validator for one recipe-level binding.
pub fn build_recipe_validator(binding: &ValidatorBinding) -> Result<RecipeValidator> {
    let validator = match binding.validator_type.as_str() {
        "FargateTaskSizeCpuMemoryLimits" => {
            RecipeValidator::FargateTaskSizeCpuMemoryLimits(configuration(binding)?)
        }
        "MinMaxConstraint" => {
            let validator: crate::validators::MinMaxConstraintValidator = configuration(binding)?;
            validator.configured()?;
            RecipeValidator::MinMaxConstraint(validator)
        }
        "ValidDockerfilePath" => RecipeValidator::ValidDockerfilePath(configuration(binding)?),
        other => {
            return Err(Error::UnknownValidatorType {
                validator_type: other.to_string(),
            });
        }
    };
    Ok(validator)
}

/// Build every recipe-level validator, in declared order.
pub fn build_recipe_validators(recipe: &RecipeDefinition) -> Result<Vec<RecipeValidator>> {
    let validators = recipe
        .validators
        .iter()
        .map(build_recipe_validator)
        .collect::<Result<Vec<_>>>()?;
    tracing::debug!(recipe_id = %recipe.id, count = validators.len(), "Built recipe validators");
    Ok(validators)
}
