//! Validators that read the recommendation around the proposed value

use std::path::PathBuf;

use serde::Deserialize;
use serde_json::Value;

use super::{display_name, input_text};
use crate::context::ValidationContext;
use crate::error::{Error, Result};
use crate::result::ValidationResult;

/// Numeric operator of a [`ComparisonValidator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ComparisonOperation {
    GreaterThan,
    GreaterThanOrEqualTo,
    LessThan,
    LessThanOrEqualTo,
}

impl ComparisonOperation {
    fn holds(self, left: f64, right: f64) -> bool {
        match self {
            ComparisonOperation::GreaterThan => left > right,
            ComparisonOperation::GreaterThanOrEqualTo => left >= right,
            ComparisonOperation::LessThan => left < right,
            ComparisonOperation::LessThanOrEqualTo => left <= right,
        }
    }

    fn phrase(self) -> &'static str {
        match self {
            ComparisonOperation::GreaterThan => "greater than",
            ComparisonOperation::GreaterThanOrEqualTo => "greater than or equal to",
            ComparisonOperation::LessThan => "less than",
            ComparisonOperation::LessThanOrEqualTo => "less than or equal to",
        }
    }
}

/// Compares the value numerically against another setting's resolved value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ComparisonValidator {
    pub operation: Option<ComparisonOperation>,
    pub setting_id: Option<String>,
}

impl ComparisonValidator {
    pub(crate) fn configured(&self) -> Result<(ComparisonOperation, &str)> {
        let operation = self
            .operation
            .ok_or_else(|| Error::missing("Comparison", "Operation"))?;
        let setting_id = self
            .setting_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::missing("Comparison", "SettingId"))?;
        Ok((operation, setting_id))
    }

    pub fn validate(&self, input: &Value, ctx: &ValidationContext<'_>) -> Result<ValidationResult> {
        let (operation, setting_id) = self.configured()?;
        let other = ctx.recommendation.get_option_setting(setting_id)?;
        let other_value = ctx.recommendation.get_value(other);

        let name = display_name(ctx.setting);
        let other_name = display_name(other);
        let Some(left) = as_number(input) else {
            return Ok(ValidationResult::failed(format!(
                "The value of '{name}' is not a numeric value."
            )));
        };
        let Some(right) = as_number(&other_value) else {
            return Ok(ValidationResult::failed(format!(
                "The value of '{other_name}' is not a numeric value."
            )));
        };

        Ok(ValidationResult::check(
            operation.holds(left, right),
            format!(
                "The value of '{name}' must be {} the value of '{other_name}'.",
                operation.phrase()
            ),
        ))
    }
}

pub(crate) fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn resolve_in_project(ctx: &ValidationContext<'_>, path: &str) -> PathBuf {
    ctx.recommendation.project().project_directory().join(path)
}

/// The value must name an existing file, relative to the project directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct FileExistsValidator {
    pub allow_empty_string: bool,
}

impl Default for FileExistsValidator {
    fn default() -> Self {
        Self {
            allow_empty_string: true,
        }
    }
}

impl FileExistsValidator {
    pub fn validate(&self, input: &Value, ctx: &ValidationContext<'_>) -> ValidationResult {
        let path = input_text(input);
        if path.is_empty() {
            return ValidationResult::check(self.allow_empty_string, "A file must be specified");
        }
        ValidationResult::check(
            resolve_in_project(ctx, &path).is_file(),
            format!("The specified file {path} does not exist"),
        )
    }
}

/// A non-empty value must name an existing directory, relative to the
/// project directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct DirectoryExistsValidator {}

impl DirectoryExistsValidator {
    pub fn validate(&self, input: &Value, ctx: &ValidationContext<'_>) -> ValidationResult {
        let path = input_text(input);
        ValidationResult::check(
            path.is_empty() || resolve_in_project(ctx, &path).is_dir(),
            "The specified directory does not exist.",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deploy_core::Recommendation;
    use deploy_test_utils::{RecipeBuilder, SettingBuilder, StaticResourceQueryer, TestProject};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;
    use tokio_util::sync::CancellationToken;

    fn scaling(project: &TestProject) -> Recommendation {
        RecipeBuilder::new("Scaling")
            .setting(SettingBuilder::int("MinCapacity").name("Min Capacity").default(1))
            .setting(SettingBuilder::int("MaxCapacity").name("Max Capacity").default(3))
            .setting(SettingBuilder::string("HealthCheckPath"))
            .recommend(project.definition())
    }

    fn check<T>(rec: &Recommendation, setting_id: &str, f: impl FnOnce(&ValidationContext<'_>) -> T) -> T {
        let queryer = StaticResourceQueryer::new();
        let cancel = CancellationToken::new();
        let setting = rec.get_option_setting(setting_id).unwrap();
        f(&ValidationContext::new(rec, setting, &queryer, &cancel))
    }

    fn greater_than(setting_id: &str) -> ComparisonValidator {
        ComparisonValidator {
            operation: Some(ComparisonOperation::GreaterThan),
            setting_id: Some(setting_id.to_string()),
        }
    }

    #[rstest]
    #[case(json!(5), None)]
    #[case(json!("4"), None)]
    #[case(json!(1), Some("The value of 'Max Capacity' must be greater than the value of 'Min Capacity'."))]
    #[case(json!("many"), Some("The value of 'Max Capacity' is not a numeric value."))]
    fn test_comparison_against_sibling(#[case] input: Value, #[case] failure: Option<&str>) {
        let project = TestProject::web("Api");
        let rec = scaling(&project);
        let result = check(&rec, "MaxCapacity", |ctx| {
            greater_than("MinCapacity").validate(&input, ctx).unwrap()
        });
        assert_eq!(result.message.as_deref(), failure);
    }

    #[test]
    fn test_comparison_reads_the_override_of_the_other_setting() {
        let project = TestProject::web("Api");
        let mut rec = scaling(&project);
        rec.set_override("MinCapacity", json!(10));
        let result = check(&rec, "MaxCapacity", |ctx| {
            greater_than("MinCapacity").validate(&json!(5), ctx).unwrap()
        });
        assert!(!result.is_valid);
    }

    #[test]
    fn test_comparison_without_operation_is_misconfigured() {
        let project = TestProject::web("Api");
        let rec = scaling(&project);
        let validator = ComparisonValidator {
            operation: None,
            setting_id: Some("MinCapacity".to_string()),
        };
        let err = check(&rec, "MaxCapacity", |ctx| validator.validate(&json!(5), ctx).unwrap_err());
        assert!(matches!(
            err,
            Error::MissingValidatorConfiguration { property: "Operation", .. }
        ));
    }

    #[test]
    fn test_comparison_against_unknown_setting_is_fatal() {
        let project = TestProject::web("Api");
        let rec = scaling(&project);
        let err = check(&rec, "MaxCapacity", |ctx| {
            greater_than("Missing").validate(&json!(5), ctx).unwrap_err()
        });
        assert!(matches!(err, Error::Core(deploy_core::Error::OptionSettingNotFound { .. })));
    }

    #[test]
    fn test_file_and_directory_exist_relative_to_project() {
        let project = TestProject::web("Api")
            .with_file("docker/Dockerfile", "FROM scratch")
            .with_dir("publish");
        let rec = scaling(&project);

        check(&rec, "HealthCheckPath", |ctx| {
            let files = FileExistsValidator::default();
            assert!(files.validate(&json!("docker/Dockerfile"), ctx).is_valid);
            assert!(files.validate(&json!(""), ctx).is_valid);
            assert_eq!(
                files.validate(&json!("docker/Missing"), ctx).message(),
                "The specified file docker/Missing does not exist"
            );
            let strict = FileExistsValidator {
                allow_empty_string: false,
            };
            assert_eq!(strict.validate(&json!(""), ctx).message(), "A file must be specified");

            let directories = DirectoryExistsValidator::default();
            assert!(directories.validate(&json!("publish"), ctx).is_valid);
            assert!(directories.validate(&json!(""), ctx).is_valid);
            assert!(!directories.validate(&json!("nowhere"), ctx).is_valid);
        });
    }
}
