//! The validator pipeline
//!
//! [`ValidatorPipeline::set_value`] is the only validated way to change a
//! recommendation's overrides:
//!
//! 1. the target setting is looked up; an Object setting takes a JSON object
//!    and routes each key to its child, a `KeyValue` path sets one key
//! 2. on a redeployment, settings that are not `Updatable` are rejected
//! 3. every validator of every affected setting runs, without
//!    short-circuiting, and all failure messages are collected in declared
//!    order
//! 4. raw text for Int, Double and Bool settings is converted to the JSON
//!    value it denotes
//! 5. only if nothing failed are the overrides written, all at once
//! 6. dependents of the changed settings that are no longer displayable
//!    lose their overrides
//!
//! Any fatal error (misconfiguration, failed query, cancellation) aborts the
//! call before anything is written.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use deploy_core::{Recommendation, ResourceQueryer, SettingNode};
use deploy_meta::OptionSettingValueType;
use futures::future::join_all;
use serde_json::{Map, Number, Value};
use tokio_util::sync::CancellationToken;

use crate::context::ValidationContext;
use crate::error::{Error, Result};
use crate::factory::{build_option_validators, build_recipe_validators};
use crate::result::ValidationResult;
use crate::validators::{display_name, input_text};

/// A value headed for one setting during a `set_value` call.
struct Staged {
    node: SettingNode,
    value: Value,
    /// Object settings are validated with the composed value but never
    /// written; their children are.
    commit: bool,
}

/// Runs validators for one session.
///
/// Cloning is cheap and clones share the cancellation token, so cancelling
/// the session cancels every in-flight call made through any clone.
#[derive(Clone)]
pub struct ValidatorPipeline {
    queryer: Arc<dyn ResourceQueryer>,
    cancel: CancellationToken,
}

impl ValidatorPipeline {
    pub fn new(queryer: Arc<dyn ResourceQueryer>) -> Self {
        Self {
            queryer,
            cancel: CancellationToken::new(),
        }
    }

    /// Use the owning session's cancellation token.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Run every validator bound to `setting` against `input`.
    ///
    /// Validators run concurrently; the failed results come back in
    /// declared order.
    ///
    /// # Errors
    ///
    /// The first fatal error in declared order.
    pub async fn validate_setting(
        &self,
        recommendation: &Recommendation,
        setting: &SettingNode,
        input: &Value,
    ) -> Result<Vec<ValidationResult>> {
        let validators = build_option_validators(&setting.item)?;
        if validators.is_empty() {
            return Ok(Vec::new());
        }

        let ctx = ValidationContext::new(recommendation, setting, self.queryer.as_ref(), &self.cancel);
        let results = join_all(validators.iter().map(|validator| validator.validate(input, &ctx))).await;

        let mut failures = Vec::new();
        for (validator, result) in validators.iter().zip(results) {
            let result = result?;
            if !result.is_valid {
                tracing::debug!(
                    setting = %setting.fully_qualified_id,
                    validator = validator.kind(),
                    message = result.message(),
                    "Validation failed"
                );
                failures.push(result);
            }
        }
        Ok(failures)
    }

    /// Validate `raw` and, if every validator passes, store it as the
    /// override of `fully_qualified_id`.
    ///
    /// # Errors
    ///
    /// `Error::ValidationFailed` carrying every failure message when the
    /// value is rejected; the overrides are then left unchanged. Fatal errors
    /// also leave the overrides unchanged.
    pub async fn set_value(
        &self,
        recommendation: &mut Recommendation,
        fully_qualified_id: &str,
        raw: Value,
    ) -> Result<()> {
        let setting = recommendation.get_option_setting(fully_qualified_id)?.clone();
        let fail = |messages: Vec<String>| Error::ValidationFailed {
            setting_id: fully_qualified_id.to_string(),
            messages,
        };

        let mut staged = Vec::new();
        let mut messages = Vec::new();
        stage(recommendation, setting, fully_qualified_id, raw, &mut staged, &mut messages)?;
        if recommendation.is_existing_cloud_application() {
            for entry in staged.iter().filter(|entry| !entry.node.item.updatable) {
                messages.push(format!(
                    "The option setting '{}' cannot be updated when redeploying an existing application.",
                    display_name(&entry.node)
                ));
            }
        }
        if !messages.is_empty() {
            return Err(fail(messages));
        }

        let rec: &Recommendation = recommendation;
        let outcomes = join_all(
            staged
                .iter()
                .map(|entry| self.validate_setting(rec, &entry.node, &entry.value)),
        )
        .await;
        for failures in outcomes {
            messages.extend(failures?.into_iter().filter_map(|failure| failure.message));
        }
        if !messages.is_empty() {
            return Err(fail(messages));
        }

        let mut writes = Vec::new();
        for entry in staged.into_iter().filter(|entry| entry.commit) {
            match coerce(&entry.node, entry.value) {
                Ok(value) => writes.push((entry.node.fully_qualified_id, value)),
                Err(message) => messages.push(message),
            }
        }
        if !messages.is_empty() {
            return Err(fail(messages));
        }

        let changed: Vec<String> = writes.iter().map(|(id, _)| id.clone()).collect();
        for (id, value) in writes {
            recommendation.set_override(id, value);
        }
        reset_hidden_dependents(recommendation, changed);
        tracing::debug!(recipe_id = %recommendation.recipe_id(), setting = fully_qualified_id, "Option setting updated");
        Ok(())
    }

    /// Run the recipe-level validators and return the failed results.
    pub fn run_recipe_validators(&self, recommendation: &Recommendation) -> Result<Vec<ValidationResult>> {
        let mut failures = Vec::new();
        for validator in build_recipe_validators(recommendation.definition())? {
            let result = validator.validate(recommendation)?;
            if !result.is_valid {
                tracing::debug!(
                    recipe_id = %recommendation.recipe_id(),
                    validator = validator.kind(),
                    message = result.message(),
                    "Recipe validation failed"
                );
                failures.push(result);
            }
        }
        Ok(failures)
    }

    /// Validate the current value of every displayable setting.
    ///
    /// All settings are validated concurrently. Returns failure messages
    /// keyed by fully qualified id; settings that pass are absent.
    pub async fn validate_all_settings(
        &self,
        recommendation: &Recommendation,
    ) -> Result<BTreeMap<String, Vec<String>>> {
        let inputs: Vec<(&SettingNode, Value)> = recommendation
            .tree()
            .iter()
            .filter(|node| !node.item.validators.is_empty() && recommendation.is_displayable(node))
            .map(|node| (node, recommendation.get_value(node)))
            .collect();

        let outcomes = join_all(
            inputs
                .iter()
                .map(|(node, value)| self.validate_setting(recommendation, node, value)),
        )
        .await;

        let mut report = BTreeMap::new();
        for ((node, _), failures) in inputs.iter().zip(outcomes) {
            let messages: Vec<String> = failures?.into_iter().filter_map(|f| f.message).collect();
            if !messages.is_empty() {
                report.insert(node.fully_qualified_id.clone(), messages);
            }
        }
        tracing::info!(
            recipe_id = %recommendation.recipe_id(),
            validated = inputs.len(),
            failed = report.len(),
            "Validated option settings"
        );
        Ok(report)
    }
}

/// Flatten a proposed value into per-setting entries.
fn stage(
    recommendation: &Recommendation,
    setting: SettingNode,
    requested_id: &str,
    raw: Value,
    staged: &mut Vec<Staged>,
    messages: &mut Vec<String>,
) -> Result<()> {
    // `Container.EnvironmentVariables.LOG_LEVEL` sets one key of a KeyValue setting
    if setting.value_type() == OptionSettingValueType::KeyValue
        && requested_id.len() > setting.fully_qualified_id.len()
    {
        let key = &requested_id[setting.fully_qualified_id.len() + 1..];
        let mut entries = match recommendation.get_value(&setting) {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        entries.insert(key.to_string(), Value::String(input_text(&raw)));
        staged.push(Staged {
            node: setting,
            value: Value::Object(entries),
            commit: true,
        });
        return Ok(());
    }

    if !setting.is_object() || setting.children.is_empty() {
        staged.push(Staged {
            node: setting,
            value: raw,
            commit: true,
        });
        return Ok(());
    }

    let children = match parse_object(raw) {
        Some(children) => children,
        None => {
            messages.push(format!(
                "The value of '{}' must be an object of its child settings.",
                display_name(&setting)
            ));
            return Ok(());
        }
    };
    // Object validators see the current children with the proposed ones laid over
    let mut composed = match recommendation.get_value(&setting) {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    for (key, value) in children {
        let child_id = format!("{}.{key}", setting.fully_qualified_id);
        let child = recommendation.get_option_setting(&child_id)?.clone();
        stage(recommendation, child, &child_id, value.clone(), staged, messages)?;
        composed.insert(key, value);
    }
    staged.push(Staged {
        node: setting,
        value: Value::Object(composed),
        commit: false,
    });
    Ok(())
}

fn parse_object(raw: Value) -> Option<Map<String, Value>> {
    match raw {
        Value::Object(map) => Some(map),
        Value::String(text) => serde_json::from_str(&text).ok(),
        _ => None,
    }
}

/// Convert raw text to the JSON shape of the setting's type.
fn coerce(setting: &SettingNode, value: Value) -> std::result::Result<Value, String> {
    let Value::String(text) = &value else {
        return Ok(value);
    };
    let invalid = |expected: &str| {
        format!(
            "The value '{text}' for '{}' is not a valid {expected}.",
            display_name(setting)
        )
    };

    match setting.value_type() {
        OptionSettingValueType::Int => text
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| invalid("integer")),
        OptionSettingValueType::Double => text
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| invalid("number")),
        OptionSettingValueType::Bool => match text.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(invalid("boolean")),
        },
        OptionSettingValueType::List if text.trim_start().starts_with('[') => {
            serde_json::from_str::<Vec<Value>>(text)
                .map(Value::Array)
                .map_err(|_| invalid("list"))
        }
        OptionSettingValueType::KeyValue if text.trim_start().starts_with('{') => {
            serde_json::from_str::<Map<String, Value>>(text)
                .map(Value::Object)
                .map_err(|_| invalid("set of key-value pairs"))
        }
        _ => Ok(value),
    }
}

/// Clear overrides of dependents that the change made invisible, following
/// the dependency graph transitively.
fn reset_hidden_dependents(recommendation: &mut Recommendation, changed: Vec<String>) {
    let mut pending = changed;
    let mut visited = BTreeSet::new();
    while let Some(id) = pending.pop() {
        let dependents: Vec<String> = recommendation
            .tree()
            .dependents_of(&id)
            .map(str::to_string)
            .collect();
        for dependent in dependents {
            if !visited.insert(dependent.clone()) {
                continue;
            }
            let hidden = recommendation
                .tree()
                .get(&dependent)
                .is_some_and(|node| !recommendation.is_displayable(node));
            if hidden && recommendation.clear_override(&dependent).is_some() {
                tracing::debug!(setting = %dependent, changed = %id, "Reset hidden dependent setting");
                pending.push(dependent);
            }
        }
    }
}
