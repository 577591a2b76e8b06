//! The installed-state ledger.
//!
//! A JSON document recording, for every declared dependency, the last
//! observed installed and latest versions and the status the last run
//! assigned. It is rewritten in full once per evaluation pass.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DepkeepError, Result};
use crate::requirements::{Dependency, DependencyDocument, DependencyRecord};

/// Ledger entries keyed by package name.
pub type LedgerEntries = BTreeMap<String, Dependency>;

/// Read the ledger at `path`, keyed by package name.
///
/// An absent or unreadable ledger is an empty one; the next save rebuilds
/// it from scratch.
pub fn load(path: &Path) -> LedgerEntries {
    load_in_order(path)
        .into_iter()
        .map(|dep| (dep.package.clone(), dep))
        .collect()
}

/// Read the ledger at `path`, keeping the order entries were written in.
///
/// Same fallbacks as [`load`].
pub fn load_in_order(path: &Path) -> Vec<Dependency> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no ledger yet");
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), "ledger unreadable, starting fresh: {}", e);
            return Vec::new();
        }
    };

    let document: DependencyDocument = match serde_json::from_str(&content) {
        Ok(document) => document,
        Err(e) => {
            tracing::warn!(path = %path.display(), "ledger is malformed, starting fresh: {}", e);
            return Vec::new();
        }
    };

    document
        .dependencies
        .into_iter()
        .filter(|record| !record.package.is_empty() && !record.version.target.is_empty())
        .map(Dependency::from)
        .collect()
}

/// Rewrite the ledger at `path` with `dependencies`, in the given order.
///
/// The document is written to a sibling temp file and renamed into
/// place, so a crash mid-write leaves the previous ledger intact.
pub fn save(path: &Path, dependencies: &[Dependency]) -> Result<()> {
    let write_error = |message: String| DepkeepError::LedgerWriteError {
        path: path.to_path_buf(),
        message,
    };

    let document = DependencyDocument {
        dependencies: dependencies.iter().map(DependencyRecord::from).collect(),
    };
    let mut content =
        serde_json::to_string_pretty(&document).map_err(|e| write_error(e.to_string()))?;
    content.push('\n');

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| write_error(e.to_string()))?;
    }

    let temp_path = temp_path_for(path);
    fs::write(&temp_path, &content).map_err(|e| write_error(e.to_string()))?;
    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(write_error(e.to_string()));
    }

    tracing::debug!(path = %path.display(), entries = dependencies.len(), "ledger written");
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "installed.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{DependencyStatus, Policy};
    use tempfile::TempDir;

    fn sample() -> Vec<Dependency> {
        let mut requests = Dependency::new("requests", Policy::Latest, "2.26.0");
        requests.installed = Some("2.26.0".into());
        requests.latest = Some("2.28.0".into());
        requests.status = DependencyStatus::Outdated;

        let mut jq = Dependency::new("jq", Policy::Restricted, "1.7.1");
        jq.status = DependencyStatus::Installing;

        vec![requests, jq]
    }

    #[test]
    fn missing_ledger_is_empty() {
        let temp = TempDir::new().unwrap();
        assert!(load(&temp.path().join("installed.json")).is_empty());
    }

    #[test]
    fn malformed_ledger_is_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("installed.json");
        fs::write(&path, "{\"dependencies\": [oops").unwrap();
        assert!(load(&path).is_empty());
    }

    #[test]
    fn save_then_load_keeps_every_field() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("installed.json");
        let deps = sample();

        save(&path, &deps).unwrap();
        let loaded = load(&path);

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded["requests"], deps[0]);
        assert_eq!(loaded["jq"], deps[1]);
    }

    #[test]
    fn load_in_order_keeps_file_order() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("installed.json");
        let mut deps = sample();
        deps.push(Dependency::new("attrs", Policy::Latest, "23.1.0"));

        save(&path, &deps).unwrap();
        let names: Vec<String> = load_in_order(&path).into_iter().map(|d| d.package).collect();

        assert_eq!(names, ["requests", "jq", "attrs"]);
    }

    #[test]
    fn resave_is_byte_identical() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("installed.json");
        let mut deps = sample();
        deps.sort_by(|a, b| a.package.cmp(&b.package));

        save(&path, &deps).unwrap();
        let first = fs::read_to_string(&path).unwrap();
        let reloaded: Vec<Dependency> = load(&path).into_values().collect();
        save(&path, &reloaded).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), first);
    }

    #[test]
    fn save_creates_parent_and_leaves_no_temp_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".depkeep").join("installed.json");

        save(&path, &sample()).unwrap();

        assert!(path.exists());
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn save_replaces_previous_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("installed.json");
        save(&path, &sample()).unwrap();

        save(&path, &sample()[..1]).unwrap();

        let loaded = load(&path);
        assert_eq!(loaded.len(), 1);
        assert!(loaded.contains_key("requests"));
    }

    #[test]
    fn unwritable_location_is_ledger_error() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("file");
        fs::write(&blocker, "").unwrap();

        let err = save(&blocker.join("installed.json"), &sample()).unwrap_err();
        assert!(matches!(err, DepkeepError::LedgerWriteError { .. }));
    }

    #[test]
    fn file_shape_is_stable() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("installed.json");
        save(&path, &sample()).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let first = &json["dependencies"][0];
        assert_eq!(first["package"], "requests");
        assert_eq!(first["version"]["status"], "outdated");
        assert_eq!(first["version"]["latest"], "2.28.0");
        assert!(json["dependencies"][1]["version"]["latest"].is_null());
    }
}
