//! Environment-variable and command-line overrides.
//!
//! Precedence, lowest to highest: config files, `DEPKEEP_*` variables,
//! command-line flags.

use std::env::VarError;
use std::path::PathBuf;

use super::DepkeepConfig;

pub const ENV_FORCE: &str = "DEPKEEP_FORCE";
pub const ENV_LEDGER: &str = "DEPKEEP_LEDGER";
pub const ENV_REQUIREMENTS: &str = "DEPKEEP_REQUIREMENTS";
pub const ENV_PYTHON: &str = "DEPKEEP_PYTHON";

/// Values given on the command line. `None`/`false` leaves config alone.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub force: bool,
    pub requirements: Option<PathBuf>,
    pub ledger: Option<PathBuf>,
}

/// Apply `DEPKEEP_*` variables from the process environment.
pub fn apply_env_overrides(config: &mut DepkeepConfig) {
    apply_env_overrides_with(config, |key| std::env::var(key));
}

/// Apply `DEPKEEP_*` variables read through `env_fn`.
pub fn apply_env_overrides_with<F>(config: &mut DepkeepConfig, env_fn: F)
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let get = |key: &str| env_fn(key).ok().filter(|v| !v.trim().is_empty());

    if let Some(raw) = get(ENV_FORCE) {
        match parse_flag(&raw) {
            Some(forced) => config.packages.installation.forced = forced,
            None => tracing::warn!(var = ENV_FORCE, value = %raw, "ignoring unrecognized boolean"),
        }
    }
    if let Some(path) = get(ENV_LEDGER) {
        config.packages.installed = PathBuf::from(path);
    }
    if let Some(path) = get(ENV_REQUIREMENTS) {
        config.packages.requirements = PathBuf::from(path);
    }
    if let Some(python) = get(ENV_PYTHON) {
        config.settings.python = python;
    }
}

/// Apply command-line flags on top of everything else.
pub fn apply_cli_overrides(config: &mut DepkeepConfig, cli: &CliOverrides) {
    if cli.force {
        config.packages.installation.forced = true;
    }
    if let Some(path) = &cli.requirements {
        config.packages.requirements = path.clone();
    }
    if let Some(path) = &cli.ledger {
        config.packages.installed = path.clone();
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
