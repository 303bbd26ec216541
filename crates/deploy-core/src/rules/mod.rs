//! Recommendation rules
//!
//! Each recipe carries rule items that decide whether the recipe applies to
//! a project and how its priority is adjusted. Tests inside a rule item are
//! ANDed; the effect side matching the combined outcome is then folded into
//! the recipe's [`RulesOutcome`].

mod evaluator;
mod test_kind;

pub use evaluator::{RuleContext, RulesOutcome, evaluate_rules};
pub use test_kind::RuleTestKind;
