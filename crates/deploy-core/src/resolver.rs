//! Value resolution for option settings
//!
//! Resolution order for a setting is:
//!
//! 1. the override stored on the recommendation,
//! 2. for Object settings, the composed values of the children,
//! 3. the default value with every replacement token substituted,
//! 4. the zero value of the setting's type.
//!
//! Unknown tokens in a default value are left as they are.

use std::collections::BTreeMap;

use deploy_meta::{DependencyOperation, OptionSettingValueType, PropertyDependency};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::recommendation::Recommendation;
use crate::tree::SettingNode;

impl Recommendation {
    /// Look up a setting by fully qualified id.
    ///
    /// The walk stops at a KeyValue setting: in `Env.LOG_LEVEL` the
    /// remainder after `Env` names a key of the KeyValue setting, so the
    /// KeyValue setting itself is returned.
    ///
    /// # Errors
    ///
    /// Returns `Error::OptionSettingNotFound` if no setting matches.
    pub fn get_option_setting(&self, fully_qualified_id: &str) -> Result<&SettingNode> {
        let not_found = || Error::OptionSettingNotFound {
            recipe: self.recipe_id().to_string(),
            id: fully_qualified_id.to_string(),
        };

        let mut path = String::new();
        let mut found = None;
        for segment in fully_qualified_id.split('.') {
            if !path.is_empty() {
                path.push('.');
            }
            path.push_str(segment);

            let node = self.tree().get(&path).ok_or_else(not_found)?;
            if node.value_type() == OptionSettingValueType::KeyValue {
                return Ok(node);
            }
            found = Some(node);
        }
        found.ok_or_else(not_found)
    }

    /// Resolve the current value of a setting.
    pub fn get_value(&self, setting: &SettingNode) -> Value {
        if let Some(value) = self.override_value(&setting.fully_qualified_id) {
            return value.clone();
        }

        if setting.is_object() && !setting.children.is_empty() {
            let mut composed = Map::new();
            for child in self.tree().children(&setting.fully_qualified_id) {
                composed.insert(child.id().to_string(), self.get_value(child));
            }
            return Value::Object(composed);
        }

        self.get_default_value(setting)
            .unwrap_or_else(|| setting.value_type().zero_value())
    }

    /// Resolve the current value of a setting by fully qualified id.
    pub fn get_value_by_id(&self, fully_qualified_id: &str) -> Result<Value> {
        let setting = self.get_option_setting(fully_qualified_id)?;
        Ok(self.get_value(setting))
    }

    /// Default value of a setting with replacement tokens substituted.
    pub fn get_default_value(&self, setting: &SettingNode) -> Option<Value> {
        setting
            .item
            .default_value
            .as_ref()
            .map(|value| apply_replacement_tokens(value, self.replacement_tokens()))
    }

    /// Whether every `DependsOn` condition of the setting currently holds.
    pub fn is_displayable(&self, setting: &SettingNode) -> bool {
        setting
            .item
            .depends_on
            .iter()
            .all(|dependency| self.dependency_satisfied(dependency))
    }

    fn dependency_satisfied(&self, dependency: &PropertyDependency) -> bool {
        let Some(target) = self.tree().get(&dependency.id) else {
            return false;
        };
        let actual = self.get_value(target);
        match dependency.operation.unwrap_or_default() {
            DependencyOperation::Equals => match &dependency.value {
                Some(expected) => values_match(&actual, expected),
                None => is_empty_value(&actual),
            },
            DependencyOperation::NotEmpty => !is_empty_value(&actual),
        }
    }
}

/// Substitute every token in every string of `value`, recursing into lists
/// and objects.
pub fn apply_replacement_tokens(value: &Value, tokens: &BTreeMap<String, String>) -> Value {
    match value {
        Value::String(text) => {
            let mut replaced = text.clone();
            for (token, replacement) in tokens {
                if replaced.contains(token.as_str()) {
                    replaced = replaced.replace(token.as_str(), replacement);
                }
            }
            Value::String(replaced)
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| apply_replacement_tokens(item, tokens))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| (key.clone(), apply_replacement_tokens(item, tokens)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Null, blank strings, empty lists and empty objects count as empty.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Equality that also matches a scalar against its text form, so that a
/// dependency on `false` is satisfied by the string `"False"`.
pub fn values_match(actual: &Value, expected: &Value) -> bool {
    if actual == expected {
        return true;
    }
    match (scalar_text(actual), scalar_text(expected)) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(&b),
        _ => false,
    }
}

/// Text form of a scalar value; `None` for lists, objects and null.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
