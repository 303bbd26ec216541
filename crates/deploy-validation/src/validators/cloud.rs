//! Validators backed by live cloud inventory
//!
//! Every lookup goes through [`ValidationContext::query`], so it honors the
//! session's cancellation signal and a failed query surfaces as an error
//! instead of a validation result. "Not found" is an ordinary answer.

use std::collections::{BTreeSet, HashSet};

use serde::Deserialize;
use serde_json::Value;

use super::{input_list, input_text};
use crate::context::ValidationContext;
use crate::error::{Error, Result};
use crate::result::ValidationResult;

const BEANSTALK_APPLICATION: &str = "AWS::ElasticBeanstalk::Application";
const BEANSTALK_ENVIRONMENT: &str = "AWS::ElasticBeanstalk::Environment";

/// The value names a resource that must not exist yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ExistingResourceValidator {
    pub resource_type: Option<String>,
}

impl ExistingResourceValidator {
    pub fn new(resource_type: &str) -> Self {
        Self {
            resource_type: Some(resource_type.to_string()),
        }
    }

    pub(crate) fn configured(&self) -> Result<&str> {
        self.resource_type
            .as_deref()
            .filter(|resource_type| !resource_type.is_empty())
            .ok_or_else(|| Error::missing("ExistingResource", "ResourceType"))
    }

    pub async fn validate(&self, input: &Value, ctx: &ValidationContext<'_>) -> Result<ValidationResult> {
        let resource_type = self.configured()?;
        let name = input_text(input);
        if name.is_empty() {
            return Ok(ValidationResult::failed(
                "The resource name is empty and cannot be validated.",
            ));
        }

        let queryer = ctx.queryer();
        let exists_as = match resource_type {
            BEANSTALK_APPLICATION => {
                let applications = ctx
                    .query(queryer.list_elastic_beanstalk_applications(Some(&name)))
                    .await?;
                applications
                    .iter()
                    .any(|application| application.application_name == name)
                    .then(|| format!("An Elastic Beanstalk application already exists with the name '{name}'."))
            }
            BEANSTALK_ENVIRONMENT => {
                let environments = ctx
                    .query(queryer.list_elastic_beanstalk_environments(Some(&name)))
                    .await?;
                environments
                    .iter()
                    .any(|environment| environment.environment_name == name)
                    .then(|| format!("An Elastic Beanstalk environment already exists with the name '{name}'."))
            }
            _ => ctx
                .query(queryer.get_cloud_control_resource(resource_type, &name))
                .await?
                .map(|_| format!("A resource of type '{resource_type}' and name '{name}' already exists.")),
        };

        Ok(match exists_as {
            Some(message) => ValidationResult::failed(format!(
                "{message} Check the AWS Console for more information on the existing resource."
            )),
            None => ValidationResult::valid(),
        })
    }
}

/// Fails when no VPC exists and the value equals `FailValue`.
///
/// Bound to settings such as "use the default VPC": choosing it is only
/// invalid when there is no VPC to use.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct VpcExistsValidator {
    pub validation_failed_message: String,
    pub fail_value: Value,
    pub value_type: deploy_meta::OptionSettingValueType,
    pub default_vpc: bool,
}

impl Default for VpcExistsValidator {
    fn default() -> Self {
        Self {
            validation_failed_message: "A VPC could not be found.".to_string(),
            fail_value: Value::Bool(true),
            value_type: deploy_meta::OptionSettingValueType::Bool,
            default_vpc: false,
        }
    }
}

impl VpcExistsValidator {
    pub async fn validate(&self, input: &Value, ctx: &ValidationContext<'_>) -> Result<ValidationResult> {
        let queryer = ctx.queryer();
        let vpc_found = if self.default_vpc {
            ctx.query(queryer.get_default_vpc()).await?.is_some()
        } else {
            !ctx.query(queryer.list_vpcs()).await?.is_empty()
        };
        if vpc_found {
            return Ok(ValidationResult::valid());
        }

        if self.value_type != deploy_meta::OptionSettingValueType::Bool {
            return Ok(ValidationResult::failed(format!(
                "The value '{:?}' for 'ValueType' is not supported.",
                self.value_type
            )));
        }
        Ok(match (as_bool(input), as_bool(&self.fail_value)) {
            (Some(value), Some(fail_value)) => {
                ValidationResult::check(value != fail_value, self.validation_failed_message.clone())
            }
            _ => ValidationResult::failed(format!(
                "The option setting value or 'FailValue' are not of type '{:?}'.",
                self.value_type
            )),
        })
    }
}

fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) => text.trim().to_ascii_lowercase().parse().ok(),
        _ => None,
    }
}

/// Whether a "use the default VPC" setting is on.
fn flag_setting(ctx: &ValidationContext<'_>, setting_id: &str) -> Result<bool> {
    Ok(as_bool(&ctx.setting_value(setting_id)?).unwrap_or(false))
}

/// Report every id in `selected` that is not in `known`.
fn members_of_vpc(
    selected: BTreeSet<String>,
    known: &HashSet<String>,
    kind: &str,
    vpc_id: &str,
) -> ValidationResult {
    let invalid: Vec<String> = selected
        .into_iter()
        .filter(|id| !known.contains(id))
        .collect();
    ValidationResult::check(
        invalid.is_empty(),
        format!(
            "The selected {kind}(s) ({}) are invalid since they do not belong to the currently selected VPC {vpc_id}.",
            invalid.join(", ")
        ),
    )
}

const VPC_NOT_SET: &str = "The VpcId setting is not set or is empty. Make sure to set the VPC Id first.";

/// Selected subnets must belong to the VPC chosen by another setting.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SubnetsInVpcValidator {
    /// Fully qualified id of the setting holding the VPC id
    pub vpc_id: String,
    /// Fully qualified id of a "use the default VPC" setting, if any
    pub default_vpc_option_path: String,
    pub validation_failed_message: String,
}

impl Default for SubnetsInVpcValidator {
    fn default() -> Self {
        Self {
            vpc_id: String::new(),
            default_vpc_option_path: String::new(),
            validation_failed_message: "The selected subnets are not part of the selected VPC."
                .to_string(),
        }
    }
}

impl SubnetsInVpcValidator {
    pub(crate) fn configured(&self) -> Result<&str> {
        if self.vpc_id.is_empty() {
            return Err(Error::missing("SubnetsInVpc", "VpcId"));
        }
        Ok(&self.vpc_id)
    }

    pub async fn validate(&self, input: &Value, ctx: &ValidationContext<'_>) -> Result<ValidationResult> {
        let vpc_setting = self.configured()?;
        let mut vpc_id = input_text(&ctx.setting_value(vpc_setting)?);
        if vpc_id.is_empty() {
            return Ok(ValidationResult::failed(VPC_NOT_SET));
        }

        let queryer = ctx.queryer();
        // The default VPC wins over an explicit VPC id when both are selected
        if !self.default_vpc_option_path.is_empty() && flag_setting(ctx, &self.default_vpc_option_path)? {
            if let Some(default_vpc) = ctx.query(queryer.get_default_vpc()).await? {
                vpc_id = default_vpc.vpc_id;
            }
        }

        let subnet_ids: HashSet<String> = ctx
            .query(queryer.describe_subnets(&vpc_id))
            .await?
            .into_iter()
            .map(|subnet| subnet.subnet_id)
            .collect();

        if let Some(selected) = input_list(input) {
            return Ok(members_of_vpc(selected.into_iter().collect(), &subnet_ids, "subnet", &vpc_id));
        }
        let subnet = input_text(input);
        Ok(ValidationResult::check(
            subnet.is_empty() || subnet_ids.contains(&subnet),
            self.validation_failed_message.clone(),
        ))
    }
}

/// Selected security groups must belong to the VPC chosen by another
/// setting. Accepts a list or a comma-separated string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SecurityGroupsInVpcValidator {
    pub vpc_id: String,
    pub is_default_vpc_option_setting_id: String,
    pub validation_failed_message: String,
}

impl Default for SecurityGroupsInVpcValidator {
    fn default() -> Self {
        Self {
            vpc_id: String::new(),
            is_default_vpc_option_setting_id: String::new(),
            validation_failed_message:
                "The selected security groups are not part of the selected VPC.".to_string(),
        }
    }
}

impl SecurityGroupsInVpcValidator {
    pub(crate) fn configured(&self) -> Result<&str> {
        if self.vpc_id.is_empty() {
            return Err(Error::missing("SecurityGroupsInVpc", "VpcId"));
        }
        Ok(&self.vpc_id)
    }

    pub async fn validate(&self, input: &Value, ctx: &ValidationContext<'_>) -> Result<ValidationResult> {
        let vpc_setting = self.configured()?;
        let queryer = ctx.queryer();

        let mut vpc_id = String::new();
        if !self.is_default_vpc_option_setting_id.is_empty()
            && flag_setting(ctx, &self.is_default_vpc_option_setting_id)?
        {
            if let Some(default_vpc) = ctx.query(queryer.get_default_vpc()).await? {
                vpc_id = default_vpc.vpc_id;
            }
        }
        if vpc_id.is_empty() {
            vpc_id = input_text(&ctx.setting_value(vpc_setting)?);
        }
        if vpc_id.is_empty() {
            return Ok(ValidationResult::failed(VPC_NOT_SET));
        }

        let group_ids: HashSet<String> = ctx
            .query(queryer.describe_security_groups(&vpc_id))
            .await?
            .into_iter()
            .map(|group| group.group_id)
            .collect();

        if let Some(selected) = input_list(input) {
            return Ok(members_of_vpc(selected.into_iter().collect(), &group_ids, "security group", &vpc_id));
        }
        match input {
            Value::String(text) if text.is_empty() => Ok(ValidationResult::valid()),
            Value::String(text) => {
                let selected = text.split(',').map(|id| id.trim().to_string()).collect();
                Ok(members_of_vpc(selected, &group_ids, "security group", &vpc_id))
            }
            other => Ok(ValidationResult::check(
                group_ids.contains(&input_text(other)),
                self.validation_failed_message.clone(),
            )),
        }
    }
}

/// The instance type must be offered in the deployment region. Empty
/// values pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct InstanceTypeValidator {}

impl InstanceTypeValidator {
    pub async fn validate(&self, input: &Value, ctx: &ValidationContext<'_>) -> Result<ValidationResult> {
        let instance_type = input_text(input);
        if instance_type.is_empty() {
            return Ok(ValidationResult::valid());
        }
        let info = ctx
            .query(ctx.queryer().describe_instance_type(&instance_type))
            .await?;
        Ok(ValidationResult::check(
            info.is_some(),
            format!("The specified instance type {instance_type} does not exist in the deployment region."),
        ))
    }
}

/// The selected VPC must have subnets in at least two availability zones.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct VpcSubnetsInDifferentAzsValidator {
    pub validation_failed_message: String,
}

impl Default for VpcSubnetsInDifferentAzsValidator {
    fn default() -> Self {
        Self {
            validation_failed_message:
                "Selected VPC must have at least two subnets in two different Availability Zones."
                    .to_string(),
        }
    }
}

impl VpcSubnetsInDifferentAzsValidator {
    pub async fn validate(&self, input: &Value, ctx: &ValidationContext<'_>) -> Result<ValidationResult> {
        let vpc_id = input_text(input);
        if vpc_id.is_empty() {
            return Ok(ValidationResult::failed(
                "A VPC ID is not specified. Please select a valid VPC ID.",
            ));
        }
        let subnets = ctx.query(ctx.queryer().describe_subnets(&vpc_id)).await?;
        let zones: HashSet<&str> = subnets
            .iter()
            .map(|subnet| subnet.availability_zone_id.as_str())
            .collect();
        Ok(ValidationResult::check(
            zones.len() >= 2,
            self.validation_failed_message.clone(),
        ))
    }
}
