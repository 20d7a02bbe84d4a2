//! Configuration module.
//!
//! Precedence (lowest to highest): defaults, config file, environment, CLI.

pub mod keybindings;
pub mod loader;

pub use keybindings::KeyBindings;
pub use loader::{
    default_config_path, default_log_path, resolve, ConfigError, ConfigFile, ResolvedConfig,
};
