//! Recommend command implementation

use colored::Colorize;
use deploy_core::Recommendation;
use deploy_meta::DeploymentType;
use serde::Serialize;

use crate::context::SessionContext;
use crate::error::Result;

/// One ranked recipe, as printed with `--json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct RecommendationSummary<'a> {
    recipe_id: &'a str,
    name: &'a str,
    target_service: &'a str,
    deployment_type: DeploymentType,
    computed_priority: i32,
}

impl<'a> From<&'a Recommendation> for RecommendationSummary<'a> {
    fn from(recommendation: &'a Recommendation) -> Self {
        let definition = recommendation.definition();
        Self {
            recipe_id: &definition.id,
            name: &definition.name,
            target_service: &definition.target_service,
            deployment_type: definition.deployment_type,
            computed_priority: recommendation.computed_priority(),
        }
    }
}

/// Run the recommend command
pub fn run_recommend(ctx: &SessionContext, json: bool) -> Result<()> {
    let recommendations = ctx.recommendations()?;

    if json {
        let summaries: Vec<RecommendationSummary> =
            recommendations.iter().map(RecommendationSummary::from).collect();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    let project_name = ctx.project.project_name();
    if recommendations.is_empty() {
        println!(
            "{} No recipe applies to {}",
            "!".yellow(),
            project_name.cyan()
        );
        return Ok(());
    }

    println!("{} {}", "Recommendations for".bold(), project_name.cyan().bold());
    println!();
    for (index, recommendation) in recommendations.iter().enumerate() {
        let definition = recommendation.definition();
        println!(
            "  {}. {} ({})",
            index + 1,
            definition.name.bold(),
            definition.id.cyan()
        );
        println!(
            "     {} {}  {} {}",
            "priority".dimmed(),
            recommendation.computed_priority(),
            "service".dimmed(),
            definition.target_service
        );
    }
    Ok(())
}
