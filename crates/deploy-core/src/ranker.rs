//! Recommendation engine: rule evaluation over a catalog plus ranking

use std::collections::BTreeMap;
use std::sync::Arc;

use deploy_meta::ProjectDefinition;

use crate::catalog::Catalog;
use crate::error::Result;
use crate::recommendation::Recommendation;
use crate::rules::{RuleContext, evaluate_rules};
use crate::session::SessionFacts;

/// Computes ranked recommendations for a project.
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    catalog: Arc<Catalog>,
    replacement_tokens: BTreeMap<String, String>,
}

impl RecommendationEngine {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            replacement_tokens: BTreeMap::new(),
        }
    }

    /// Tokens registered on every recommendation the engine creates.
    pub fn with_replacement_tokens(mut self, tokens: BTreeMap<String, String>) -> Self {
        self.replacement_tokens = tokens;
        self
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Evaluate every recipe against the project and rank the survivors.
    ///
    /// A recipe is excluded when it has no rules, when any rule item yields
    /// `Include = false`, or when its computed priority is negative.
    ///
    /// # Errors
    ///
    /// Fails on the first recipe with a broken rule definition.
    pub fn compute_recommendations(
        &self,
        project: &ProjectDefinition,
        session: &SessionFacts,
    ) -> Result<Vec<Recommendation>> {
        let project = Arc::new(project.clone());
        let mut recommendations = Vec::new();

        for recipe in self.catalog.iter() {
            let definition = recipe.definition();
            if definition.recommendation_rules.is_empty() {
                tracing::debug!(recipe_id = %definition.id, "Skipping recipe without rules");
                continue;
            }

            let outcome = evaluate_rules(&RuleContext {
                recipe: definition,
                project: &project,
                session,
            })?;
            if !outcome.include {
                continue;
            }

            let priority = outcome.computed_priority(definition.recipe_priority);
            if priority < 0 {
                tracing::debug!(recipe_id = %definition.id, priority, "Excluding recipe with negative priority");
                continue;
            }

            recommendations.push(
                Recommendation::new(Arc::clone(recipe), Arc::clone(&project), priority)
                    .with_replacement_tokens(self.replacement_tokens.clone()),
            );
        }

        rank(&mut recommendations);
        tracing::info!(
            project = %project.project_path.display(),
            count = recommendations.len(),
            "Computed recommendations"
        );
        Ok(recommendations)
    }
}

/// `Evaluate(catalog, project facts, session facts)` with no extra tokens.
pub fn evaluate(
    catalog: &Arc<Catalog>,
    project: &ProjectDefinition,
    session: &SessionFacts,
) -> Result<Vec<Recommendation>> {
    RecommendationEngine::new(Arc::clone(catalog)).compute_recommendations(project, session)
}

/// Sort by computed priority, highest first. Ties keep their current order.
pub fn rank(recommendations: &mut [Recommendation]) {
    recommendations.sort_by(|a, b| b.computed_priority().cmp(&a.computed_priority()));
}

/// First recommendation that can redeploy an application created from
/// `recipe_id`.
pub fn find_compatible<'a>(
    recommendations: &'a [Recommendation],
    recipe_id: &str,
) -> Option<&'a Recommendation> {
    recommendations
        .iter()
        .find(|recommendation| recommendation.is_compatible_with(recipe_id))
}
