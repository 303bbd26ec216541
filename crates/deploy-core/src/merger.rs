//! Applying persisted settings from a previous deployment
//!
//! The bag is the JSON object a previous session saved. Keys are setting
//! ids; Object settings may be stored nested (`{"ECSCluster": {"CreateNew":
//! false}}`) or flattened by fully qualified id (`{"ECSCluster.CreateNew":
//! false}`). Both shapes are accepted.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::recommendation::Recommendation;
use crate::tree::SettingsTree;

impl Recommendation {
    /// Overwrite overrides with previously persisted values.
    ///
    /// Values are stored without running any validator; they were validated
    /// when first set. Keys that match no setting are skipped with a warning.
    /// Returns the number of overrides written.
    pub fn apply_previous_settings(&mut self, previous: &Map<String, Value>) -> usize {
        let recipe = Arc::clone(self.recipe());
        let mut pending = Vec::new();
        collect(recipe.tree(), "", previous, &mut pending);

        let applied = pending.len();
        for (fully_qualified_id, value) in pending {
            self.set_override(fully_qualified_id, value);
        }
        tracing::debug!(recipe_id = %self.recipe_id(), applied, "Applied previous settings");
        applied
    }
}

fn collect(
    tree: &SettingsTree,
    prefix: &str,
    bag: &Map<String, Value>,
    pending: &mut Vec<(String, Value)>,
) {
    for (key, value) in bag {
        let fully_qualified_id = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        let Some(node) = tree.get(&fully_qualified_id) else {
            tracing::warn!(setting = %fully_qualified_id, "Ignoring persisted value for unknown setting");
            continue;
        };

        match value {
            Value::Object(children) if node.is_object() && !node.children.is_empty() => {
                collect(tree, &fully_qualified_id, children, pending);
            }
            _ => pending.push((fully_qualified_id, value.clone())),
        }
    }
}
