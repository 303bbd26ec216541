//! Error types for deploy-meta

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Recipe directory not found: {path}")]
    RecipeDirectoryNotFound { path: PathBuf },

    #[error("Failed to deserialize recipe [{path}]: {message}")]
    InvalidRecipe { path: PathBuf, message: String },

    #[error("Invalid recipe definition: {0}")]
    Json(#[from] serde_json::Error),
}
