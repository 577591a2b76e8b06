//! Configuration loading for depkeep.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Deep merging in [`merger`]
//! - Environment and command-line overrides in [`overrides`]
//!
//! # Example
//!
//! ```
//! use depkeep::config::load_config;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let dir = temp.path().join(".depkeep");
//! fs::create_dir_all(&dir).unwrap();
//! fs::write(dir.join("config.yml"), "settings:\n  command_timeout: 30\n").unwrap();
//!
//! let config = load_config(temp.path(), None).unwrap();
//! assert_eq!(config.settings.command_timeout, 30);
//! ```
//!
//! # Configuration File Locations
//!
//! Merged in this order:
//! 1. User global config (`~/.depkeep/config.yml`)
//! 2. Project config (`.depkeep/config.yml`)
//! 3. Local overrides (`.depkeep/config.local.yml`)

pub mod loader;
pub mod merger;
pub mod overrides;
pub mod schema;

pub use loader::{
    find_project_root, load_config, load_config_value, load_merged_config, ConfigPaths,
};
pub use merger::{deep_merge, merge_configs};
pub use overrides::{
    apply_cli_overrides, apply_env_overrides, apply_env_overrides_with, CliOverrides,
};
pub use schema::{
    DepkeepConfig, EnvironmentOverride, InstallationConfig, PackagesConfig, Settings,
};
