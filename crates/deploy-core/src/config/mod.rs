//! Layered tool configuration
//!
//! Configuration is loaded and merged from these sources (later sources
//! override earlier):
//!
//! 1. **Global defaults** - `<config_dir>/deploy-config/config.toml`
//! 2. **Project config** - `<project>/.deploy/config.toml`
//! 3. **Local overrides** - `<project>/.deploy/config.local.toml`
//!
//! # Example
//!
//! ```toml
//! recipe_paths = ["../shared-recipes"]
//!
//! [replacement_tokens]
//! "{StackName}" = "orders-api"
//!
//! [session]
//! region = "us-west-2"
//! docker_available = true
//! supported_deployment_types = ["CdkProject", "BeanstalkEnvironment"]
//! ```

mod resolver;
mod tool_config;

pub use resolver::ConfigResolver;
pub use tool_config::{SessionSection, ToolConfig};
