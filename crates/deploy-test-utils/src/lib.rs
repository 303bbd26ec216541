//! Shared test utilities for the deploy-config workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`recipe`]: [`RecipeBuilder`] and [`SettingBuilder`] for recipe definitions
//! - [`project`]: [`TestProject`] temporary project directory
//! - [`queryer`]: [`StaticResourceQueryer`] in-memory cloud inventory

pub mod project;
pub mod queryer;
pub mod recipe;

pub use project::TestProject;
pub use queryer::StaticResourceQueryer;
pub use recipe::{RecipeBuilder, SettingBuilder};
