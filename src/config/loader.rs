//! Configuration file discovery and loading.

use crate::config::merger::merge_configs;
use crate::config::schema::DepkeepConfig;
use crate::error::{DepkeepError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Paths to configuration files, in merge order (later overrides earlier).
///
/// 1. User global config (`~/.depkeep/config.yml`)
/// 2. Project config (`.depkeep/config.yml`)
/// 3. Local overrides (`.depkeep/config.local.yml`)
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    pub user_global: Option<PathBuf>,
    pub project: Option<PathBuf>,
    pub project_local: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files for the given project root.
    pub fn discover(project_root: &Path) -> Self {
        Self {
            user_global: dirs::home_dir()
                .map(|home| home.join(".depkeep").join("config.yml"))
                .filter(|p| p.exists()),
            project: existing(project_root.join(".depkeep").join("config.yml")),
            project_local: existing(project_root.join(".depkeep").join("config.local.yml")),
        }
    }

    /// All existing config paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        [&self.user_global, &self.project, &self.project_local]
            .into_iter()
            .flatten()
            .collect()
    }
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    path.exists().then_some(path)
}

/// Find the project root by walking up from `start`.
///
/// A directory containing `.depkeep/` or `requirements.json` is a root;
/// `.git` is accepted as a fallback marker.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        if current.join(".depkeep").is_dir() || current.join("requirements.json").is_file() {
            return Some(current);
        }

        if current.join(".git").exists() {
            return Some(current);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load a config file as a raw YAML value for merging.
///
/// An empty file is an empty mapping.
pub fn load_config_value(path: &Path) -> Result<serde_yaml::Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DepkeepError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            DepkeepError::Io(e)
        }
    })?;

    if content.trim().is_empty() {
        return Ok(serde_yaml::Value::Mapping(Default::default()));
    }

    serde_yaml::from_str(&content).map_err(|e| DepkeepError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn from_layers(layers: &[serde_yaml::Value], source: &Path) -> Result<DepkeepConfig> {
    let merged = merge_configs(layers);
    serde_yaml::from_value(merged).map_err(|e| DepkeepError::ConfigParseError {
        path: source.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load and merge every discovered config file.
///
/// No config files at all is not an error; defaults apply.
pub fn load_merged_config(project_root: &Path) -> Result<DepkeepConfig> {
    let paths = ConfigPaths::discover(project_root);
    let existing = paths.all_existing();

    let mut layers = Vec::with_capacity(existing.len());
    for path in &existing {
        tracing::debug!(path = %path.display(), "loading config layer");
        layers.push(load_config_value(path)?);
    }

    let source = existing
        .last()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| project_root.join(".depkeep").join("config.yml"));
    from_layers(&layers, &source)
}

/// Load config with an optional explicit path.
///
/// An explicit path replaces discovery entirely and must exist.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<DepkeepConfig> {
    match config_override {
        Some(path) => {
            let value = load_config_value(path)?;
            from_layers(&[value], path)
        }
        None => load_merged_config(project_root),
    }
}
