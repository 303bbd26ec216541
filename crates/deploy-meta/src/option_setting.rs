//! Option setting items
//!
//! The configurable surface of a recipe is a tree of [`OptionSettingItem`]s.
//! Object-typed items carry child settings; every item can declare validators
//! and "visible when" dependencies on other settings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Primitive shape of a setting value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OptionSettingValueType {
    #[default]
    String,
    Int,
    Double,
    Bool,
    KeyValue,
    Object,
    List,
}

impl OptionSettingValueType {
    /// Value used when a setting has neither an override nor a default.
    ///
    /// Object settings start from an empty object; the resolver fills in
    /// child values.
    pub fn zero_value(&self) -> Value {
        match self {
            OptionSettingValueType::String => Value::String(String::new()),
            OptionSettingValueType::Int => Value::from(0),
            OptionSettingValueType::Double => Value::from(0.0),
            OptionSettingValueType::Bool => Value::Bool(false),
            OptionSettingValueType::List => Value::Array(Vec::new()),
            OptionSettingValueType::KeyValue | OptionSettingValueType::Object => {
                Value::Object(serde_json::Map::new())
            }
        }
    }
}

/// Semantic kind of resource a setting refers to.
///
/// Front-ends use this to offer lists of existing resources. Unknown hints
/// deserialize to [`TypeHint::Other`] so newer recipes still load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeHint {
    BeanstalkApplication,
    BeanstalkEnvironment,
    InstanceType,
    IAMRole,
    ECSCluster,
    ECRRepository,
    Vpc,
    ExistingVpc,
    ExistingSubnets,
    ExistingSecurityGroups,
    DockerExecutionDirectory,
    DockerBuildArgs,
    DotnetPublishArgs,
    DotnetBeanstalkPlatformArn,
    FilePath,
    #[serde(other)]
    Other,
}

/// Comparison applied by a [`PropertyDependency`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DependencyOperation {
    /// The referenced setting must equal the dependency value
    #[default]
    Equals,
    /// The referenced setting must hold a non-empty value
    NotEmpty,
}

/// "Visible when" link from a setting to another setting's value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PropertyDependency {
    /// Fully qualified id of the referenced setting
    pub id: String,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub operation: Option<DependencyOperation>,
}

/// A validator kind plus its loose configuration payload.
///
/// The payload is interpreted by the validator factory, which turns it into
/// a typed validator or reports the binding as misconfigured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ValidatorBinding {
    pub validator_type: String,
    #[serde(default)]
    pub configuration: Option<Value>,
}

impl ValidatorBinding {
    pub fn new(validator_type: impl Into<String>) -> Self {
        Self {
            validator_type: validator_type.into(),
            configuration: None,
        }
    }

    pub fn with_configuration(mut self, configuration: Value) -> Self {
        self.configuration = Some(configuration);
        self
    }
}

/// A configurable setting of a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OptionSettingItem {
    /// Unique among siblings; never changes once a recipe is released
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "Type", default)]
    pub value_type: OptionSettingValueType,
    #[serde(default)]
    pub type_hint: Option<TypeHint>,
    #[serde(default)]
    pub type_hint_data: serde_json::Map<String, Value>,
    /// May embed replacement tokens such as `{ProjectName}`
    #[serde(default)]
    pub default_value: Option<Value>,
    #[serde(default)]
    pub allowed_values: Vec<String>,
    /// Service value -> display value
    #[serde(default)]
    pub value_mapping: BTreeMap<String, String>,
    #[serde(default)]
    pub advanced_setting: bool,
    /// Whether the setting may change during a redeployment
    #[serde(default)]
    pub updatable: bool,
    #[serde(default)]
    pub parent_setting_id: Option<String>,
    #[serde(default)]
    pub depends_on: Vec<PropertyDependency>,
    #[serde(default)]
    pub child_option_settings: Vec<OptionSettingItem>,
    #[serde(default)]
    pub validators: Vec<ValidatorBinding>,
}

impl OptionSettingItem {
    /// Create a setting with the given id and type and no other metadata.
    pub fn new(id: impl Into<String>, value_type: OptionSettingValueType) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            description: String::new(),
            value_type,
            type_hint: None,
            type_hint_data: serde_json::Map::new(),
            default_value: None,
            allowed_values: Vec::new(),
            value_mapping: BTreeMap::new(),
            advanced_setting: false,
            updatable: false,
            parent_setting_id: None,
            depends_on: Vec::new(),
            child_option_settings: Vec::new(),
            validators: Vec::new(),
        }
    }

    /// Display value for a service value, falling back to the value itself.
    pub fn display_value<'a>(&'a self, value: &'a str) -> &'a str {
        self.value_mapping
            .get(value)
            .map(String::as_str)
            .unwrap_or(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_deserialize_nested_setting() {
        let item: OptionSettingItem = serde_json::from_value(json!({
            "Id": "ECSCluster",
            "Name": "ECS Cluster",
            "Type": "Object",
            "TypeHint": "ECSCluster",
            "ChildOptionSettings": [
                { "Id": "CreateNew", "Type": "Bool", "DefaultValue": true },
                {
                    "Id": "ClusterArn",
                    "Type": "String",
                    "DependsOn": [ { "Id": "ECSCluster.CreateNew", "Value": false } ],
                    "Validators": [
                        { "ValidatorType": "Regex", "Configuration": { "Regex": "^arn:.+" } }
                    ]
                }
            ]
        }))
        .unwrap();

        assert_eq!(item.value_type, OptionSettingValueType::Object);
        assert_eq!(item.type_hint, Some(TypeHint::ECSCluster));
        assert_eq!(item.child_option_settings.len(), 2);

        let arn = &item.child_option_settings[1];
        assert_eq!(arn.depends_on[0].id, "ECSCluster.CreateNew");
        assert_eq!(arn.depends_on[0].value, Some(json!(false)));
        assert_eq!(arn.depends_on[0].operation, None);
        assert_eq!(arn.validators[0].validator_type, "Regex");
    }

    #[test]
    fn test_unknown_type_hint_is_tolerated() {
        let item: OptionSettingItem = serde_json::from_value(json!({
            "Id": "Something",
            "TypeHint": "SomeFutureHint"
        }))
        .unwrap();
        assert_eq!(item.type_hint, Some(TypeHint::Other));
        assert_eq!(item.value_type, OptionSettingValueType::String);
    }

    #[test]
    fn test_zero_values() {
        assert_eq!(OptionSettingValueType::String.zero_value(), json!(""));
        assert_eq!(OptionSettingValueType::Int.zero_value(), json!(0));
        assert_eq!(OptionSettingValueType::Bool.zero_value(), json!(false));
        assert_eq!(OptionSettingValueType::List.zero_value(), json!([]));
        assert_eq!(OptionSettingValueType::KeyValue.zero_value(), json!({}));
    }

    #[test]
    fn test_display_value_mapping() {
        let mut item = OptionSettingItem::new("EnvironmentType", OptionSettingValueType::String);
        item.value_mapping
            .insert("SingleInstance".to_string(), "Single Instance".to_string());

        assert_eq!(item.display_value("SingleInstance"), "Single Instance");
        assert_eq!(item.display_value("LoadBalanced"), "LoadBalanced");
    }
}
