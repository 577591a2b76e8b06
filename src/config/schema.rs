//! Configuration schema.
//!
//! Config files are YAML; JSON is accepted as-is since it is a subset.
//! Every field has a default, so an absent file yields a usable config.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::environment::InstallMethod;

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepkeepConfig {
    /// Pin parts of the detected environment.
    pub environment: EnvironmentOverride,

    /// Where requirements and the ledger live, and how installs behave.
    pub packages: PackagesConfig,

    /// Interpreter and subprocess settings.
    pub settings: Settings,
}

/// Partial override of the detected environment.
///
/// Fields left unset are detected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentOverride {
    pub install_method: Option<InstallMethod>,
    pub externally_managed: Option<bool>,
    pub backend_available: Option<bool>,
}

impl EnvironmentOverride {
    /// Whether nothing needs probing for the interpreter.
    pub fn pins_interpreter(&self) -> bool {
        self.install_method.is_some() && self.externally_managed.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackagesConfig {
    /// Requirements file, relative to the project root.
    pub requirements: PathBuf,

    /// Ledger file, relative to the project root.
    pub installed: PathBuf,

    pub installation: InstallationConfig,
}

impl Default for PackagesConfig {
    fn default() -> Self {
        Self {
            requirements: PathBuf::from("requirements.json"),
            installed: PathBuf::from(".depkeep").join("installed.json"),
            installation: InstallationConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallationConfig {
    /// Install even into an externally managed interpreter.
    pub forced: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Interpreter used to run pip.
    pub python: String,

    /// Per-command timeout in seconds; 0 disables it.
    pub command_timeout: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            python: default_python().to_string(),
            command_timeout: 300,
        }
    }
}

fn default_python() -> &'static str {
    if cfg!(target_os = "windows") {
        "python"
    } else {
        "python3"
    }
}

impl DepkeepConfig {
    /// Requirements path resolved against `root`.
    pub fn requirements_path(&self, root: &Path) -> PathBuf {
        root.join(&self.packages.requirements)
    }

    /// Ledger path resolved against `root`.
    pub fn ledger_path(&self, root: &Path) -> PathBuf {
        root.join(&self.packages.installed)
    }

    /// Whether installs into externally managed interpreters are forced.
    pub fn forced(&self) -> bool {
        self.packages.installation.forced
    }
}
