//! The install/upgrade/downgrade decision matrix.
//!
//! | installed vs target | `latest`     | `restricted` |
//! |---------------------|--------------|--------------|
//! | missing             | installing   | installing   |
//! | below               | upgrading    | restricted   |
//! | equal, newer exists | outdated     | matched      |
//! | equal, none newer   | matched      | matched      |
//! | above               | upgraded     | downgraded   |
//!
//! Everything here is pure; the installer turns a status into commands.

use std::cmp::Ordering;
use std::fmt;

use super::status::{DependencyStatus, Policy};
use super::version::{compare_versions, is_newer_version};

/// Compute the status of one dependency.
///
/// `adhoc` bypasses the table and always yields [`DependencyStatus::Adhoc`].
///
/// Versions that cannot be ordered (neither parseable nor identical)
/// are treated as drift below the target.
pub fn evaluate(
    installed: Option<&str>,
    target: &str,
    latest: Option<&str>,
    policy: Policy,
    adhoc: bool,
) -> DependencyStatus {
    if adhoc {
        return DependencyStatus::Adhoc;
    }

    let Some(installed) = installed else {
        return DependencyStatus::Installing;
    };

    let ordering = compare_versions(installed, target).unwrap_or(Ordering::Less);

    match (ordering, policy) {
        (Ordering::Less, Policy::Latest) => DependencyStatus::Upgrading,
        (Ordering::Less, Policy::Restricted) => DependencyStatus::Restricted,
        (Ordering::Equal, Policy::Latest) => match latest {
            Some(latest) if is_newer_version(latest, installed) => DependencyStatus::Outdated,
            _ => DependencyStatus::Matched,
        },
        (Ordering::Equal, Policy::Restricted) => DependencyStatus::Matched,
        (Ordering::Greater, Policy::Latest) => DependencyStatus::Upgraded,
        (Ordering::Greater, Policy::Restricted) => DependencyStatus::Downgraded,
    }
}

/// What the installer should do to a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Install,
    Upgrade,
    Downgrade,
}

impl ActionKind {
    /// Lowercase verb for messages.
    pub fn verb(&self) -> &'static str {
        match self {
            ActionKind::Install => "install",
            ActionKind::Upgrade => "upgrade",
            ActionKind::Downgrade => "downgrade",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// An action and the exact version it should land on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedAction {
    pub kind: ActionKind,
    pub version: String,
}

/// The version a policy wants installed.
///
/// `latest` takes the newest known version as long as it does not fall
/// below the target; `restricted` always takes the target.
pub fn desired_version(policy: Policy, target: &str, latest: Option<&str>) -> String {
    match (policy, latest) {
        (Policy::Latest, Some(latest)) if !is_newer_version(target, latest) => latest.to_string(),
        _ => target.to_string(),
    }
}

/// Turn a status into the action the installer should take, if any.
///
/// `matched`, `restricted`, `outdated` and `upgraded` are log-only.
pub fn plan(
    status: DependencyStatus,
    policy: Policy,
    target: &str,
    latest: Option<&str>,
) -> Option<PlannedAction> {
    let (kind, version) = match status {
        DependencyStatus::Installing => (ActionKind::Install, desired_version(policy, target, latest)),
        DependencyStatus::Upgrading => (ActionKind::Upgrade, desired_version(policy, target, latest)),
        DependencyStatus::Downgraded => (ActionKind::Downgrade, target.to_string()),
        DependencyStatus::Adhoc => (
            ActionKind::Install,
            latest.map(str::to_string).unwrap_or_else(|| target.to_string()),
        ),
        DependencyStatus::Matched
        | DependencyStatus::Restricted
        | DependencyStatus::Outdated
        | DependencyStatus::Upgraded
        | DependencyStatus::Missing => return None,
    };
    Some(PlannedAction { kind, version })
}
