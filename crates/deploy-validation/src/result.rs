//! Validation outcomes and message templates

use serde::Serialize;

/// Outcome of one validator run against one value.
///
/// Validators return a failed result for bad input and reserve `Err` for
/// misconfiguration and collaborator faults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    #[serde(rename = "ValidationFailedMessage", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: Some(message.into()),
        }
    }

    /// Valid when `condition` holds, otherwise failed with `message`.
    pub fn check(condition: bool, message: impl Into<String>) -> Self {
        if condition {
            Self::valid()
        } else {
            Self::failed(message)
        }
    }

    /// The failure message, or an empty string for a valid result.
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }
}

/// Replace every `{{name}}` placeholder in `template`.
///
/// Placeholders without a matching entry are left as they are.
///
/// # Example
///
/// ```
/// use deploy_validation::interpolate;
///
/// let message = interpolate("Value must match Regex {{Regex}}", &[("Regex", "^[a-z]+$")]);
/// assert_eq!(message, "Value must match Regex ^[a-z]+$");
/// ```
pub fn interpolate(template: &str, values: &[(&str, &str)]) -> String {
    values
        .iter()
        .fold(template.to_string(), |message, (name, value)| {
            message.replace(&format!("{{{{{name}}}}}"), value)
        })
}
