//! Loader for `*.recipe` definition files
//!
//! Recipes live as JSON documents in one or more directories:
//!
//! ```text
//! recipes/
//!   AspNetAppEcsFargate.recipe
//!   AspNetAppElasticBeanstalkLinux.recipe
//! custom-recipes/
//!   MyDeploymentProject.recipe
//! ```
//!
//! Only the top level of each directory is scanned. When two files declare
//! the same recipe id, the first one loaded wins.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::recipe::RecipeDefinition;
use crate::{Error, Result};

/// File extension of recipe definition files.
pub const RECIPE_FILE_EXTENSION: &str = "recipe";

/// Parse a single recipe definition from its JSON text.
pub fn parse_recipe(content: &str) -> Result<RecipeDefinition> {
    Ok(serde_json::from_str(content)?)
}

/// Load recipe definitions from the given directories, in order.
///
/// Files within a directory are read in file name order so the resulting
/// catalog order is deterministic.
///
/// # Errors
///
/// Fails if a directory does not exist, a file cannot be read, or a file is
/// not a valid recipe definition.
pub fn load_recipe_definitions<P: AsRef<Path>>(directories: &[P]) -> Result<Vec<RecipeDefinition>> {
    let mut seen = HashSet::new();
    let mut definitions = Vec::new();

    for dir in directories {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(Error::RecipeDirectoryNotFound {
                path: dir.to_path_buf(),
            });
        }

        for path in recipe_files(dir)? {
            let content = fs::read_to_string(&path).map_err(|source| Error::Io {
                path: path.clone(),
                source,
            })?;
            let mut definition = parse_recipe(&content).map_err(|e| Error::InvalidRecipe {
                path: path.clone(),
                message: e.to_string(),
            })?;

            if !seen.insert(definition.id.clone()) {
                tracing::debug!(id = %definition.id, ?path, "Skipping recipe with duplicate id");
                continue;
            }

            tracing::debug!(id = %definition.id, ?path, "Loaded recipe definition");
            definition.recipe_path = Some(path);
            definitions.push(definition);
        }
    }

    Ok(definitions)
}

fn recipe_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|source| Error::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().is_some_and(|ext| ext == RECIPE_FILE_EXTENSION)
        })
        .collect();
    files.sort();
    Ok(files)
}
