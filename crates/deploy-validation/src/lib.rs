//! Validation layer for deploy-config
//!
//! Validators are bound to option settings and recipes in recipe data as
//! `(ValidatorType, Configuration)` pairs. This crate builds them and runs
//! them:
//!
//! - [`factory`]: bindings to typed validators
//! - [`validators`]: the built-in validator kinds
//! - [`pipeline`]: [`ValidatorPipeline`], the validated way to change a
//!   recommendation's overrides
//! - [`context`]: what a validator can see while it runs

pub mod context;
pub mod error;
pub mod factory;
pub mod pipeline;
pub mod result;
pub mod validators;

pub use context::ValidationContext;
pub use error::{Error, Result};
pub use factory::{
    build_option_validator, build_option_validators, build_recipe_validator,
    build_recipe_validators,
};
pub use pipeline::ValidatorPipeline;
pub use result::{ValidationResult, interpolate};
pub use validators::{OptionSettingValidator, RecipeValidator};
