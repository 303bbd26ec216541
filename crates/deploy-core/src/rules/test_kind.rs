//! Rule test kinds

use std::fmt;
use std::str::FromStr;

use deploy_meta::{RuleCondition, RuleTest};

use super::RuleContext;
use crate::error::{Error, Result};

/// The closed set of rule tests a recipe may reference by `Type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleTestKind {
    /// `Sdk` attribute equals `Value` (case-insensitive) or is in `AllowedValues`
    MSProjectSdkAttribute,
    /// Build property `PropertyName` equals `Value` or is in `AllowedValues`
    MSProperty,
    /// Build property `PropertyName` is set to a non-empty value
    MSPropertyExists,
    /// File `FileName` exists relative to the project directory
    FileExists,
    /// Package `NuGetPackageName` is referenced by the project
    NuGetPackageReference,
    /// The session can run the recipe's deployment type
    SupportedDeploymentType,
}

impl RuleTestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleTestKind::MSProjectSdkAttribute => "MSProjectSdkAttribute",
            RuleTestKind::MSProperty => "MSProperty",
            RuleTestKind::MSPropertyExists => "MSPropertyExists",
            RuleTestKind::FileExists => "FileExists",
            RuleTestKind::NuGetPackageReference => "NuGetPackageReference",
            RuleTestKind::SupportedDeploymentType => "SupportedDeploymentType",
        }
    }

    /// Run the test against a recipe's context.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingRuleCondition` if the condition lacks a field the
    /// test needs.
    pub fn execute(&self, condition: &RuleCondition, context: &RuleContext<'_>) -> Result<bool> {
        let project = context.project;
        let passed = match self {
            RuleTestKind::MSProjectSdkAttribute => {
                let sdk = project.sdk_type.as_deref().unwrap_or_default();
                self.matches_value(condition, context, sdk)?
            }
            RuleTestKind::MSProperty => {
                let name = self.require(context, "PropertyName", &condition.property_name)?;
                match project.property(name) {
                    Some(value) => self.matches_value(condition, context, value)?,
                    None => false,
                }
            }
            RuleTestKind::MSPropertyExists => {
                let name = self.require(context, "PropertyName", &condition.property_name)?;
                project.property(name).is_some_and(|value| !value.trim().is_empty())
            }
            RuleTestKind::FileExists => {
                let file_name = self.require(context, "FileName", &condition.file_name)?;
                let on_disk = project.project_directory().join(file_name).is_file();
                on_disk || (project.has_docker_file && file_name.eq_ignore_ascii_case("Dockerfile"))
            }
            RuleTestKind::NuGetPackageReference => {
                let package =
                    self.require(context, "NuGetPackageName", &condition.nuget_package_name)?;
                project.package_reference_version(package).is_some()
            }
            RuleTestKind::SupportedDeploymentType => context
                .session
                .supports(context.recipe.deployment_type),
        };

        tracing::debug!(
            recipe_id = %context.recipe.id,
            test = self.as_str(),
            passed,
            "Executed rule test"
        );
        Ok(passed)
    }

    /// `Value` wins over `AllowedValues` when both are present.
    fn matches_value(
        &self,
        condition: &RuleCondition,
        context: &RuleContext<'_>,
        actual: &str,
    ) -> Result<bool> {
        if let Some(expected) = &condition.value {
            return Ok(expected.eq_ignore_ascii_case(actual));
        }
        if !condition.allowed_values.is_empty() {
            return Ok(condition.allowed_values.iter().any(|allowed| allowed == actual));
        }
        Err(self.missing(context, "Value"))
    }

    fn require<'c>(
        &self,
        context: &RuleContext<'_>,
        field: &'static str,
        value: &'c Option<String>,
    ) -> Result<&'c str> {
        value.as_deref().ok_or_else(|| self.missing(context, field))
    }

    fn missing(&self, context: &RuleContext<'_>, field: &'static str) -> Error {
        Error::MissingRuleCondition {
            recipe_id: context.recipe.id.clone(),
            test_type: self.as_str().to_string(),
            field,
        }
    }
}

impl FromStr for RuleTestKind {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "MSProjectSdkAttribute" => Ok(RuleTestKind::MSProjectSdkAttribute),
            "MSProperty" => Ok(RuleTestKind::MSProperty),
            "MSPropertyExists" => Ok(RuleTestKind::MSPropertyExists),
            "FileExists" => Ok(RuleTestKind::FileExists),
            "NuGetPackageReference" => Ok(RuleTestKind::NuGetPackageReference),
            "SupportedDeploymentType" => Ok(RuleTestKind::SupportedDeploymentType),
            _ => Err(()),
        }
    }
}

impl fmt::Display for RuleTestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve a test's kind or report it as unknown for the recipe.
pub(super) fn resolve_kind(recipe_id: &str, test: &RuleTest) -> Result<RuleTestKind> {
    test.test_type
        .parse()
        .map_err(|()| Error::UnknownRuleTest {
            recipe_id: recipe_id.to_string(),
            test_type: test.test_type.clone(),
        })
}
