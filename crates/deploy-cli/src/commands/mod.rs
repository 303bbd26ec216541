//! Command implementations for deploy-cli

pub mod recommend;
pub mod settings;
pub mod validate;

pub use recommend::run_recommend;
pub use settings::run_settings;
pub use validate::run_validate;
