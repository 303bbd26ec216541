//! Recipe catalog
//!
//! The catalog is built once per process from the loaded recipe definitions.
//! Each recipe gets its settings arena at construction time; afterwards the
//! catalog is read-only and shared across sessions through [`Arc`].

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use deploy_meta::{RecipeDefinition, load_recipe_definitions};

use crate::error::{Error, Result};
use crate::tree::SettingsTree;

/// A recipe definition together with its settings arena.
#[derive(Debug, Clone)]
pub struct Recipe {
    definition: RecipeDefinition,
    tree: SettingsTree,
}

impl Recipe {
    /// Build the settings arena for a definition.
    ///
    /// `DependsOn` cycles are logged and tolerated.
    pub fn new(definition: RecipeDefinition) -> Result<Self> {
        let tree = SettingsTree::build(&definition.id, &definition.option_settings)?;
        for cycle in tree.cycles() {
            tracing::warn!(recipe_id = %definition.id, ?cycle, "Option settings depend on each other");
        }
        Ok(Self { definition, tree })
    }

    pub fn id(&self) -> &str {
        &self.definition.id
    }

    pub fn definition(&self) -> &RecipeDefinition {
        &self.definition
    }

    pub fn tree(&self) -> &SettingsTree {
        &self.tree
    }
}

/// Ordered, read-only set of recipes with unique ids.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    recipes: Vec<Arc<Recipe>>,
}

impl Catalog {
    /// Build a catalog, keeping the order of `definitions`.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateRecipeId` when two definitions share an id,
    /// or any error from building a recipe's settings arena.
    pub fn new(definitions: impl IntoIterator<Item = RecipeDefinition>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut recipes = Vec::new();
        for definition in definitions {
            if !seen.insert(definition.id.clone()) {
                return Err(Error::DuplicateRecipeId { id: definition.id });
            }
            recipes.push(Arc::new(Recipe::new(definition)?));
        }
        tracing::debug!(count = recipes.len(), "Built recipe catalog");
        Ok(Self { recipes })
    }

    /// Load `*.recipe` files from the given directories and build a catalog.
    pub fn load<P: AsRef<Path>>(directories: &[P]) -> Result<Self> {
        Self::new(load_recipe_definitions(directories)?)
    }

    /// Recipes in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Recipe>> {
        self.recipes.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Recipe>> {
        self.recipes.iter().find(|recipe| recipe.id() == id)
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}
