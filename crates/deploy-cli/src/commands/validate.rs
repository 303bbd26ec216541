//! Validate command implementation

use colored::Colorize;
use deploy_core::Recommendation;
use deploy_validation::{Error as ValidationError, ValidatorPipeline};
use serde_json::Value;

use crate::error::{CliError, Result};

/// Run the validate command
///
/// Rejected values are reported and counted; the command fails at the end if
/// anything was rejected. Fatal validation errors abort immediately.
pub async fn run_validate(
    mut recommendation: Recommendation,
    pipeline: &ValidatorPipeline,
    assignments: &[(String, String)],
    all: bool,
) -> Result<()> {
    let mut failures = 0;

    for (id, value) in assignments {
        match pipeline
            .set_value(&mut recommendation, id, Value::String(value.clone()))
            .await
        {
            Ok(()) => println!("{} {} = {}", "+".green(), id.cyan(), value),
            Err(ValidationError::ValidationFailed {
                setting_id,
                messages,
            }) => {
                failures += messages.len();
                for message in messages {
                    println!("{} {}: {}", "!".red(), setting_id.cyan(), message);
                }
            }
            Err(err) => return Err(err.into()),
        }
    }

    if all {
        for (id, messages) in pipeline.validate_all_settings(&recommendation).await? {
            failures += messages.len();
            for message in messages {
                println!("{} {}: {}", "!".red(), id.cyan(), message);
            }
        }
    }

    for result in pipeline.run_recipe_validators(&recommendation)? {
        failures += 1;
        println!(
            "{} {}: {}",
            "!".red(),
            recommendation.recipe_id().cyan(),
            result.message()
        );
    }

    if failures > 0 {
        return Err(CliError::user(format!(
            "{failures} validation failure(s) in recipe {}",
            recommendation.recipe_id()
        )));
    }
    println!("{}", "All values are valid".green());
    Ok(())
}
