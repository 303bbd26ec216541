//! Folding rule items into an include decision and a priority delta

use deploy_meta::{ProjectDefinition, RecipeDefinition, RecommendationRuleItem};

use super::test_kind::resolve_kind;
use crate::error::Result;
use crate::session::SessionFacts;

/// Everything a rule test may look at.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub recipe: &'a RecipeDefinition,
    pub project: &'a ProjectDefinition,
    pub session: &'a SessionFacts,
}

/// Aggregate result of a recipe's rule items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RulesOutcome {
    pub include: bool,
    /// Sum of the matched priority adjustments
    pub priority_adjustment: i32,
}

impl Default for RulesOutcome {
    fn default() -> Self {
        Self {
            include: true,
            priority_adjustment: 0,
        }
    }
}

impl RulesOutcome {
    /// Priority of the recommendation: base priority plus the adjustments.
    pub fn computed_priority(&self, base_priority: i32) -> i32 {
        base_priority.saturating_add(self.priority_adjustment)
    }
}

/// Evaluate every rule item of the context's recipe.
///
/// Include starts `true` and adjustments start at `0`. Any item whose
/// effect yields `Include = false` excludes the recipe; the remaining items
/// are still evaluated so that definition errors surface regardless of
/// order.
///
/// An item's include decision comes from the effect side selected by the
/// test result (`Include` defaulting to `true` when the side sets only a
/// priority). Without that side, whether the whole effect or just the
/// selected half is missing, the item includes exactly when its tests pass.
///
/// # Errors
///
/// Fails on an unknown test type or a test missing a required condition.
pub fn evaluate_rules(context: &RuleContext<'_>) -> Result<RulesOutcome> {
    let mut outcome = RulesOutcome::default();
    for item in &context.recipe.recommendation_rules {
        let passed = run_tests(item, context)?;

        let effect = item.effect.as_ref().and_then(|effect| effect.side(passed));
        let include = match effect {
            Some(side) => side.include.unwrap_or(true),
            None => passed,
        };
        outcome.include &= include;

        if let Some(delta) = effect.and_then(|side| side.priority_adjustment) {
            outcome.priority_adjustment = outcome.priority_adjustment.saturating_add(delta);
        }
    }

    tracing::debug!(
        recipe_id = %context.recipe.id,
        include = outcome.include,
        priority_adjustment = outcome.priority_adjustment,
        "Evaluated recommendation rules"
    );
    Ok(outcome)
}

/// AND the tests of one rule item, stopping at the first failure.
fn run_tests(item: &RecommendationRuleItem, context: &RuleContext<'_>) -> Result<bool> {
    for test in &item.tests {
        let kind = resolve_kind(&context.recipe.id, test)?;
        if !kind.execute(&test.condition, context)? {
            return Ok(false);
        }
    }
    Ok(true)
}
