//! Error types for deploy-validation

use deploy_core::ResourceQueryError;

/// Result type for deploy-validation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or running validators
///
/// Only [`Error::ValidationFailed`] describes a bad user value. Every other
/// variant is fatal: a broken recipe definition, a failing collaborator or
/// an abandoned session.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A validator binding names a kind no validator implements
    #[error("Unknown validator type '{validator_type}'")]
    UnknownValidatorType { validator_type: String },

    /// A validator configuration payload could not be interpreted
    #[error("Invalid configuration for validator '{validator_type}': {message}")]
    InvalidValidatorConfiguration {
        validator_type: String,
        message: String,
    },

    /// A validator is bound without a configuration value it requires
    #[error("Validator '{validator_type}' is missing the required configuration '{property}'")]
    MissingValidatorConfiguration {
        validator_type: String,
        property: &'static str,
    },

    /// A cloud inventory query could not be answered
    #[error(transparent)]
    ResourceQuery(#[from] ResourceQueryError),

    /// The owning session abandoned the validation
    #[error("Validation was cancelled")]
    Cancelled,

    /// The proposed value was rejected by one or more validators
    #[error("Invalid value for option setting '{setting_id}': {}", .messages.join(" "))]
    ValidationFailed {
        setting_id: String,
        messages: Vec<String>,
    },

    /// Error from deploy-core
    #[error(transparent)]
    Core(#[from] deploy_core::Error),
}

impl Error {
    pub(crate) fn missing(validator_type: &str, property: &'static str) -> Self {
        Error::MissingValidatorConfiguration {
            validator_type: validator_type.to_string(),
            property,
        }
    }

    /// Whether the error describes a user-correctable value.
    pub fn is_validation_failure(&self) -> bool {
        matches!(self, Error::ValidationFailed { .. })
    }
}
