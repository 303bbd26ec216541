//! Core layer for deploy-config
//!
//! This crate turns recipe definitions and project facts into ranked,
//! configurable recommendations:
//!
//! - [`catalog`]: read-only recipe catalog with a settings arena per recipe
//! - [`rules`]: rule tests and the include/priority fold
//! - [`ranker`]: evaluation over a catalog and ranking
//! - [`Recommendation`]: a recipe bound to one project, with overrides
//! - value resolution, displayability and persisted-settings merge on
//!   [`Recommendation`]
//! - [`probe`] and [`query`]: seams for project facts and cloud inventory
//! - [`config`]: layered tool configuration

pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
mod merger;
pub mod probe;
pub mod query;
pub mod ranker;
pub mod recommendation;
mod resolver;
pub mod rules;
pub mod session;
pub mod tree;

#[cfg(test)]
mod testing;

pub use catalog::{Catalog, Recipe};
pub use config::{ConfigResolver, ToolConfig};
pub use error::{Error, Result};
pub use probe::{FactsFileProbe, ProjectProbe};
pub use query::{QueryResult, ResourceQueryError, ResourceQueryer};
pub use ranker::{RecommendationEngine, evaluate, find_compatible, rank};
pub use recommendation::Recommendation;
pub use resolver::{apply_replacement_tokens, is_empty_value, scalar_text, values_match};
pub use session::SessionFacts;
pub use tree::{SettingNode, SettingsTree};

// Re-export the data model so dependents need only one import path
pub use deploy_meta;
