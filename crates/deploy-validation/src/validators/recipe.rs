//! Recipe-level validators
//!
//! These check constraints that span several settings and run against the
//! whole recommendation rather than one proposed value.

use std::path::{Component, Path, PathBuf};

use deploy_core::{Error as CoreError, Recommendation, scalar_text};
use serde::Deserialize;

use super::contextual::as_number;
use crate::error::{Error, Result};
use crate::result::{ValidationResult, interpolate};

/// Valid Fargate task memory values (MiB) for each task CPU value.
fn fargate_memory_values(cpu: &str) -> Option<Vec<u32>> {
    let stepped = |start: u32, end: u32| -> Vec<u32> { (start..=end).step_by(1024).collect() };
    match cpu {
        "256" => Some(vec![512, 1024, 2048]),
        "512" => Some(stepped(1024, 4096)),
        "1024" => Some(stepped(2048, 8192)),
        "2048" => Some(stepped(4096, 16384)),
        "4096" => Some(stepped(8192, 30720)),
        _ => None,
    }
}

/// Resolved value of a setting as text; `None` when the recipe has no such
/// setting.
fn setting_text(recommendation: &Recommendation, fully_qualified_id: &str) -> Result<Option<String>> {
    match recommendation.get_value_by_id(fully_qualified_id) {
        Ok(value) => Ok(Some(scalar_text(&value).unwrap_or_default())),
        Err(CoreError::OptionSettingNotFound { .. }) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Task CPU and task memory must form a combination Fargate accepts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct FargateTaskSizeCpuMemoryLimitsValidator {
    pub cpu_option_settings_id: String,
    pub memory_option_settings_id: String,
    pub validation_failed_message: String,
    pub invalid_cpu_value_validation_failed_message: Option<String>,
}

impl Default for FargateTaskSizeCpuMemoryLimitsValidator {
    fn default() -> Self {
        Self {
            cpu_option_settings_id: "TaskCpu".to_string(),
            memory_option_settings_id: "TaskMemory".to_string(),
            validation_failed_message:
                "Cpu value {{cpu}} is not compatible with memory value {{memory}}.  Allowed values are {{memoryList}}"
                    .to_string(),
            invalid_cpu_value_validation_failed_message: None,
        }
    }
}

impl FargateTaskSizeCpuMemoryLimitsValidator {
    pub fn validate(&self, recommendation: &Recommendation) -> Result<ValidationResult> {
        let cpu = setting_text(recommendation, &self.cpu_option_settings_id)?;
        let memory = setting_text(recommendation, &self.memory_option_settings_id)?;
        let (Some(cpu), Some(memory)) = (cpu, memory) else {
            return Ok(ValidationResult::failed(
                "Could not find a valid value for Task CPU or Task Memory as part of of the ECS Fargate \
                 deployment configuration. Please provide a valid value and try again.",
            ));
        };

        let Some(allowed) = fargate_memory_values(&cpu) else {
            let message = self
                .invalid_cpu_value_validation_failed_message
                .as_deref()
                .map(|template| interpolate(template, &[("cpu", &cpu)]))
                .unwrap_or_else(|| "Cpu validation failed".to_string());
            return Ok(ValidationResult::failed(message));
        };

        let allowed: Vec<String> = allowed.iter().map(u32::to_string).collect();
        Ok(ValidationResult::check(
            allowed.contains(&memory),
            interpolate(
                &self.validation_failed_message,
                &[
                    ("cpu", &cpu),
                    ("memory", &memory),
                    ("memoryList", &allowed.join(", ")),
                ],
            ),
        ))
    }
}

/// One numeric setting must not exceed another.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MinMaxConstraintValidator {
    pub min_value_option_settings_id: String,
    pub max_value_option_settings_id: String,
    pub validation_failed_message: String,
}

impl Default for MinMaxConstraintValidator {
    fn default() -> Self {
        Self {
            min_value_option_settings_id: String::new(),
            max_value_option_settings_id: String::new(),
            validation_failed_message: "The value specified for {{MinValueOptionSettingsId}} must be less than or equal to \
                                        the value specified for {{MaxValueOptionSettingsId}}"
                .to_string(),
        }
    }
}

impl MinMaxConstraintValidator {
    pub(crate) fn configured(&self) -> Result<(&str, &str)> {
        if self.min_value_option_settings_id.is_empty() {
            return Err(Error::missing("MinMaxConstraint", "MinValueOptionSettingsId"));
        }
        if self.max_value_option_settings_id.is_empty() {
            return Err(Error::missing("MinMaxConstraint", "MaxValueOptionSettingsId"));
        }
        Ok((&self.min_value_option_settings_id, &self.max_value_option_settings_id))
    }

    pub fn validate(&self, recommendation: &Recommendation) -> Result<ValidationResult> {
        let (min_id, max_id) = self.configured()?;
        let number = |id: &str| -> Result<Option<f64>> {
            match recommendation.get_value_by_id(id) {
                Ok(value) => Ok(as_number(&value)),
                Err(CoreError::OptionSettingNotFound { .. }) => Ok(None),
                Err(err) => Err(err.into()),
            }
        };

        let (Some(min), Some(max)) = (number(min_id)?, number(max_id)?) else {
            return Ok(ValidationResult::failed(format!(
                "Could not find a valid value for {min_id} or {max_id}. Please provide a valid value and try again."
            )));
        };
        Ok(ValidationResult::check(
            min <= max,
            interpolate(
                &self.validation_failed_message,
                &[
                    ("MinValueOptionSettingsId", min_id),
                    ("MaxValueOptionSettingsId", max_id),
                ],
            ),
        ))
    }
}

/// The Dockerfile must lie inside the Docker execution directory, since the
/// execution directory is the build context.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ValidDockerfilePathValidator {
    pub dockerfile_path_option_settings_id: String,
    pub docker_execution_directory_option_settings_id: String,
}

impl Default for ValidDockerfilePathValidator {
    fn default() -> Self {
        Self {
            dockerfile_path_option_settings_id: "DockerfilePath".to_string(),
            docker_execution_directory_option_settings_id: "DockerExecutionDirectory".to_string(),
        }
    }
}

impl ValidDockerfilePathValidator {
    pub fn validate(&self, recommendation: &Recommendation) -> Result<ValidationResult> {
        let dockerfile = setting_text(recommendation, &self.dockerfile_path_option_settings_id)?
            .unwrap_or_default();
        let execution_directory =
            setting_text(recommendation, &self.docker_execution_directory_option_settings_id)?
                .unwrap_or_default();
        // Nothing user-specified to compare; both may be computed later
        if dockerfile.is_empty() || execution_directory.is_empty() {
            return Ok(ValidationResult::valid());
        }

        let project_directory = recommendation.project().project_directory();
        let absolute_dockerfile = normalize(&project_directory.join(&dockerfile));
        let absolute_directory = normalize(&project_directory.join(&execution_directory));

        Ok(ValidationResult::check(
            absolute_dockerfile.starts_with(&absolute_directory),
            format!(
                "The specified Dockerfile \"{}\" is not located within the specified Docker execution directory \"{execution_directory}\"",
                absolute_dockerfile.display()
            ),
        ))
    }
}

/// Resolve `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use deploy_test_utils::{RecipeBuilder, SettingBuilder, TestProject};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn fargate(project: &TestProject) -> Recommendation {
        RecipeBuilder::new("AspNetAppEcsFargate")
            .setting(SettingBuilder::string("TaskCpu").default("256"))
            .setting(SettingBuilder::string("TaskMemory").default("512"))
            .recommend(project.definition())
    }

    #[rstest]
    #[case("256", "2048", true)]
    #[case("1024", "5120", true)]
    #[case("4096", "30720", true)]
    #[case("512", "8192", false)]
    #[case("2048", "2048", false)]
    fn test_fargate_cpu_memory_pairs(#[case] cpu: &str, #[case] memory: &str, #[case] valid: bool) {
        let project = TestProject::web("Api");
        let mut rec = fargate(&project);
        rec.set_override("TaskCpu", json!(cpu));
        rec.set_override("TaskMemory", json!(memory));

        let result = FargateTaskSizeCpuMemoryLimitsValidator::default().validate(&rec).unwrap();
        assert_eq!(result.is_valid, valid, "{cpu}/{memory}");
    }

    #[test]
    fn test_fargate_message_lists_allowed_memory() {
        let project = TestProject::web("Api");
        let mut rec = fargate(&project);
        rec.set_override("TaskMemory", json!("4096"));

        let result = FargateTaskSizeCpuMemoryLimitsValidator::default().validate(&rec).unwrap();
        assert_eq!(
            result.message(),
            "Cpu value 256 is not compatible with memory value 4096.  Allowed values are 512, 1024, 2048"
        );
    }

    #[test]
    fn test_fargate_unknown_cpu_and_missing_setting() {
        let project = TestProject::web("Api");
        let mut rec = fargate(&project);
        rec.set_override("TaskCpu", json!("3"));
        let validator = FargateTaskSizeCpuMemoryLimitsValidator {
            invalid_cpu_value_validation_failed_message: Some("Cpu {{cpu}} is not supported".to_string()),
            ..Default::default()
        };
        assert_eq!(validator.validate(&rec).unwrap().message(), "Cpu 3 is not supported");

        let without_memory = RecipeBuilder::new("R")
            .setting(SettingBuilder::string("TaskCpu").default("256"))
            .recommend(project.definition());
        let result = FargateTaskSizeCpuMemoryLimitsValidator::default()
            .validate(&without_memory)
            .unwrap();
        assert!(result.message().starts_with("Could not find a valid value for Task CPU or Task Memory"));
    }

    fn scaling(project: &TestProject, min: i64, max: i64) -> Recommendation {
        RecipeBuilder::new("Scaling")
            .setting(SettingBuilder::int("MinInstanceCount").default(min))
            .setting(SettingBuilder::int("MaxInstanceCount").default(max))
            .recommend(project.definition())
    }

    fn min_max() -> MinMaxConstraintValidator {
        MinMaxConstraintValidator {
            min_value_option_settings_id: "MinInstanceCount".to_string(),
            max_value_option_settings_id: "MaxInstanceCount".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_min_max_constraint() {
        let project = TestProject::web("Api");
        assert!(min_max().validate(&scaling(&project, 1, 1)).unwrap().is_valid);

        let result = min_max().validate(&scaling(&project, 4, 2)).unwrap();
        assert_eq!(
            result.message(),
            "The value specified for MinInstanceCount must be less than or equal to the value specified for MaxInstanceCount"
        );
    }

    #[test]
    fn test_min_max_requires_both_ids() {
        let err = MinMaxConstraintValidator::default().configured().unwrap_err();
        assert!(matches!(
            err,
            Error::MissingValidatorConfiguration {
                property: "MinValueOptionSettingsId",
                ..
            }
        ));
    }

    #[rstest]
    #[case("Dockerfile", ".", true)]
    #[case("docker/Dockerfile", "docker", true)]
    #[case("Dockerfile", "docker", false)]
    #[case("docker/../Dockerfile", "docker", false)]
    #[case("", "docker", true)]
    #[case("Dockerfile", "", true)]
    fn test_dockerfile_inside_execution_directory(
        #[case] dockerfile: &str,
        #[case] directory: &str,
        #[case] valid: bool,
    ) {
        let project = TestProject::web("Api");
        let mut rec = RecipeBuilder::new("Container")
            .setting(SettingBuilder::string("DockerfilePath"))
            .setting(SettingBuilder::string("DockerExecutionDirectory"))
            .recommend(project.definition());
        rec.set_override("DockerfilePath", json!(dockerfile));
        rec.set_override("DockerExecutionDirectory", json!(directory));

        let result = ValidDockerfilePathValidator::default().validate(&rec).unwrap();
        assert_eq!(result.is_valid, valid, "{dockerfile} in {directory}");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
    }
}
