//! Configuration file loading for prism
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./prism.toml`
//! 3. XDG config: `$XDG_CONFIG_HOME/prism/config.toml`
//! 4. Environment variables prefixed `PRISM_`
//! 5. Default values

mod error;
mod file_config;
mod loader;

pub use error::{ConfigError, ConfigValidationError};
pub use file_config::{
    FileConfidenceConfig, FileConfig, FileOutputConfig, FileOutputFormat, FilePipelineConfig,
    FileProviderConfig, builtin_providers,
};
pub use loader::ConfigLoader;
