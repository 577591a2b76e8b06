//! Policy modes and dependency statuses.
//!
//! Both enums serialize to the lowercase strings stored in the
//! requirements file and the ledger.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Per-package directive governing drift from the target version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// Upgrades beyond the target are permitted.
    #[default]
    Latest,
    /// Pinned to the target; drift is flagged, never followed.
    Restricted,
}

impl Policy {
    /// The string stored in requirements and ledger files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Policy::Latest => "latest",
            Policy::Restricted => "restricted",
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Policy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "latest" => Ok(Self::Latest),
            "restricted" => Ok(Self::Restricted),
            _ => Err(format!("unknown policy: {}", s)),
        }
    }
}

/// Outcome of evaluating one dependency against its policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyStatus {
    /// Not installed; will be installed.
    Installing,
    /// Installed below target under `latest`; will be upgraded.
    Upgrading,
    /// Installed above target under `restricted`; will be forced back.
    Downgraded,
    /// Installed above target under `latest`; accepted as is.
    Upgraded,
    /// Installed at target with nothing newer to consider.
    Matched,
    /// Installed at target under `latest` while a newer version exists.
    Outdated,
    /// Installed below target under `restricted`; drift is flagged only.
    Restricted,
    /// Not yet evaluated in this pass.
    Missing,
    /// Ad-hoc override: always (re)install the newest known version.
    Adhoc,
}

impl DependencyStatus {
    /// All statuses, in declaration order.
    pub const ALL: [DependencyStatus; 9] = [
        DependencyStatus::Installing,
        DependencyStatus::Upgrading,
        DependencyStatus::Downgraded,
        DependencyStatus::Upgraded,
        DependencyStatus::Matched,
        DependencyStatus::Outdated,
        DependencyStatus::Restricted,
        DependencyStatus::Missing,
        DependencyStatus::Adhoc,
    ];

    /// The string stored in the ledger.
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyStatus::Installing => "installing",
            DependencyStatus::Upgrading => "upgrading",
            DependencyStatus::Downgraded => "downgraded",
            DependencyStatus::Upgraded => "upgraded",
            DependencyStatus::Matched => "matched",
            DependencyStatus::Outdated => "outdated",
            DependencyStatus::Restricted => "restricted",
            DependencyStatus::Missing => "missing",
            DependencyStatus::Adhoc => "adhoc",
        }
    }

    /// Whether the installer runs a command for this status.
    pub fn requires_action(&self) -> bool {
        matches!(
            self,
            DependencyStatus::Installing
                | DependencyStatus::Upgrading
                | DependencyStatus::Downgraded
                | DependencyStatus::Adhoc
        )
    }
}

impl fmt::Display for DependencyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DependencyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == lowered)
            .ok_or_else(|| format!("unknown status: {}", s))
    }
}
