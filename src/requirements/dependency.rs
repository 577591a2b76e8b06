//! The per-package descriptor and its JSON shape.

use serde::{Deserialize, Serialize};

use crate::policy::{DependencyStatus, Policy};

/// One declared package and everything known about it this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub package: String,
    pub policy: Policy,
    pub target: String,
    pub installed: Option<String>,
    pub latest: Option<String>,
    pub status: DependencyStatus,
}

impl Dependency {
    /// A freshly declared dependency, not yet resolved.
    pub fn new(package: impl Into<String>, policy: Policy, target: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            policy,
            target: target.into(),
            installed: None,
            latest: None,
            status: DependencyStatus::Missing,
        }
    }
}

/// `{"package": ..., "version": {...}}` as it appears on disk.
///
/// The same shape serves the requirements file (only `policy` and
/// `target` present) and the ledger (every field present).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRecord {
    pub package: String,
    pub version: VersionRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    #[serde(default)]
    pub policy: Policy,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installed: Option<String>,
    #[serde(default)]
    pub latest: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DependencyStatus>,
}

/// Top-level `{"dependencies": [...]}` document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyDocument {
    #[serde(default)]
    pub dependencies: Vec<DependencyRecord>,
}

impl From<&Dependency> for DependencyRecord {
    fn from(dep: &Dependency) -> Self {
        Self {
            package: dep.package.clone(),
            version: VersionRecord {
                policy: dep.policy,
                target: dep.target.clone(),
                installed: dep.installed.clone(),
                latest: dep.latest.clone(),
                status: Some(dep.status),
            },
        }
    }
}

impl From<DependencyRecord> for Dependency {
    fn from(record: DependencyRecord) -> Self {
        let VersionRecord {
            policy,
            target,
            installed,
            latest,
            status,
        } = record.version;
        Self {
            package: record.package,
            policy,
            target,
            installed,
            latest,
            status: status.unwrap_or(DependencyStatus::Missing),
        }
    }
}
