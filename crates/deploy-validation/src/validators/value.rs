//! Validators that only look at the proposed value

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use super::{input_list, input_text};
use crate::result::{ValidationResult, interpolate};

/// The value must be non-empty; a list must hold at least one item.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RequiredValidator {
    pub validation_failed_message: String,
}

impl Default for RequiredValidator {
    fn default() -> Self {
        Self {
            validation_failed_message:
                "The option setting '{{OptionSetting}}' can not be empty. Please select a valid value."
                    .to_string(),
        }
    }
}

impl RequiredValidator {
    pub fn validate(&self, input: &Value, setting_name: &str) -> ValidationResult {
        let message = interpolate(&self.validation_failed_message, &[("OptionSetting", setting_name)]);
        let present = match input_list(input) {
            Some(items) => !items.is_empty(),
            None => !input_text(input).is_empty(),
        };
        ValidationResult::check(present, message)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct RegexConfig {
    regex: String,
    validation_failed_message: String,
    allow_empty_string: bool,
}

impl Default for RegexConfig {
    fn default() -> Self {
        Self {
            regex: "(.*)".to_string(),
            validation_failed_message: "Value must match Regex {{Regex}}".to_string(),
            allow_empty_string: false,
        }
    }
}

/// The value must match a pattern. List values are checked item by item.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RegexConfig")]
pub struct RegexValidator {
    regex: Regex,
    validation_failed_message: String,
    allow_empty_string: bool,
}

impl TryFrom<RegexConfig> for RegexValidator {
    type Error = regex::Error;

    fn try_from(config: RegexConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            regex: Regex::new(&config.regex)?,
            validation_failed_message: config.validation_failed_message,
            allow_empty_string: config.allow_empty_string,
        })
    }
}

impl RegexValidator {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        RegexConfig {
            regex: pattern.to_string(),
            ..RegexConfig::default()
        }
        .try_into()
    }

    pub fn allow_empty_string(mut self, allow: bool) -> Self {
        self.allow_empty_string = allow;
        self
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    pub fn validate(&self, input: &Value) -> ValidationResult {
        let matches = |text: &str| {
            (self.allow_empty_string && text.is_empty()) || self.regex.is_match(text)
        };
        let valid = match input_list(input) {
            Some(items) => items.iter().all(|item| matches(item)),
            None => matches(&input_text(input)),
        };
        ValidationResult::check(
            valid,
            interpolate(&self.validation_failed_message, &[("Regex", self.pattern())]),
        )
    }
}

/// The value must parse as an integer within `[Min, Max]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RangeValidator {
    pub min: i32,
    pub max: i32,
    pub validation_failed_message: String,
    pub allow_empty_string: bool,
}

impl Default for RangeValidator {
    fn default() -> Self {
        Self {
            min: i32::MIN,
            max: i32::MAX,
            validation_failed_message:
                "Value must be greater than or equal to {{Min}} and less than or equal to {{Max}}"
                    .to_string(),
            allow_empty_string: false,
        }
    }
}

impl RangeValidator {
    pub fn new(min: i32, max: i32) -> Self {
        Self {
            min,
            max,
            ..Self::default()
        }
    }

    pub fn validate(&self, input: &Value) -> ValidationResult {
        let text = input_text(input);
        if self.allow_empty_string && text.is_empty() {
            return ValidationResult::valid();
        }
        let in_range = text
            .trim()
            .parse::<i32>()
            .is_ok_and(|number| (self.min..=self.max).contains(&number));
        ValidationResult::check(
            in_range,
            interpolate(
                &self.validation_failed_message,
                &[("Min", &self.min.to_string()), ("Max", &self.max.to_string())],
            ),
        )
    }
}

/// The value's length in characters must be within `[MinLength, MaxLength]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct StringLengthValidator {
    pub min_length: usize,
    pub max_length: usize,
    pub validation_failed_message: String,
}

impl Default for StringLengthValidator {
    fn default() -> Self {
        Self {
            min_length: 0,
            max_length: 1000,
            validation_failed_message:
                "Invalid value. Number of characters must be between {{min}} and {{max}}".to_string(),
        }
    }
}

impl StringLengthValidator {
    pub fn validate(&self, input: &Value) -> ValidationResult {
        let length = input_text(input).chars().count();
        ValidationResult::check(
            (self.min_length..=self.max_length).contains(&length),
            interpolate(
                &self.validation_failed_message,
                &[
                    ("min", &self.min_length.to_string()),
                    ("max", &self.max_length.to_string()),
                ],
            ),
        )
    }
}

static ABSOLUTE_URI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://[^\s/?#]+[^\s]*$").expect("Invalid absolute URI regex")
});

/// The value must be an absolute URI. Empty values pass.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct UriValidator {
    pub validation_failed_message: String,
}

impl Default for UriValidator {
    fn default() -> Self {
        Self {
            validation_failed_message: "{{URI}} is not a valid URI.".to_string(),
        }
    }
}

impl UriValidator {
    pub fn validate(&self, input: &Value) -> ValidationResult {
        let uri = input_text(input);
        if uri.is_empty() {
            return ValidationResult::valid();
        }
        ValidationResult::check(
            ABSOLUTE_URI.is_match(&uri),
            interpolate(&self.validation_failed_message, &[("URI", &uri)]),
        )
    }
}

/// Flags a user may not pass because the deployment step sets them itself.
struct ReservedFlag {
    names: &'static [&'static str],
    message: &'static str,
}

fn reserved_flag_messages(arguments: &str, reserved: &[ReservedFlag]) -> Vec<&'static str> {
    let tokens: Vec<&str> = arguments.split_whitespace().collect();
    reserved
        .iter()
        .filter(|flag| {
            tokens.iter().any(|token| {
                flag.names.iter().any(|name| {
                    *token == *name
                        || (name.starts_with("--")
                            && token.strip_prefix(*name).is_some_and(|rest| rest.starts_with('=')))
                })
            })
        })
        .map(|flag| flag.message)
        .collect()
}

fn reserved_flags_result(prefix: &str, messages: Vec<&str>) -> ValidationResult {
    if messages.is_empty() {
        return ValidationResult::valid();
    }
    ValidationResult::failed(format!("{prefix}\n{}", messages.join("\n")))
}

const DOCKER_BUILD_RESERVED: &[ReservedFlag] = &[
    ReservedFlag {
        names: &["-t", "--tag"],
        message: "You must not include -t/--tag as an additional argument as it is used internally. \
                  You may set the Image Tag property in the advanced settings for some recipes.",
    },
    ReservedFlag {
        names: &["-f", "--file"],
        message: "You must not include -f/--file as an additional argument as it is used internally.",
    },
];

/// Extra `docker build` arguments must not repeat flags set internally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct DockerBuildArgsValidator {}

impl DockerBuildArgsValidator {
    pub fn validate(&self, input: &Value) -> ValidationResult {
        reserved_flags_result(
            "Invalid value for additional Docker build options.",
            reserved_flag_messages(&input_text(input), DOCKER_BUILD_RESERVED),
        )
    }
}

const DOTNET_PUBLISH_RESERVED: &[ReservedFlag] = &[
    ReservedFlag {
        names: &["-o", "--output"],
        message: "You must not include -o/--output as an additional argument as it is used internally.",
    },
    ReservedFlag {
        names: &["-c", "--configuration"],
        message: "You must not include -c/--configuration as an additional argument. \
                  You can set the build configuration in the advanced settings.",
    },
    ReservedFlag {
        names: &["--self-contained", "--no-self-contained"],
        message: "You must not include --self-contained/--no-self-contained as an additional argument. \
                  You can set the self-contained property in the advanced settings.",
    },
];

/// Extra `dotnet publish` arguments must not repeat flags set internally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct DotnetPublishArgsValidator {}

impl DotnetPublishArgsValidator {
    pub fn validate(&self, input: &Value) -> ValidationResult {
        reserved_flags_result(
            "Invalid value for Dotnet Publish Arguments.",
            reserved_flag_messages(&input_text(input), DOTNET_PUBLISH_RESERVED),
        )
    }
}
