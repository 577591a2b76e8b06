//! Homebrew backend.

use serde::Deserialize;
use std::cmp::Ordering;

use super::{query, run_install, succeeds, BackendKind, InstallRequest, VersionBackend};
use crate::error::Result;
use crate::policy::{compare_versions, normalize_version, ActionKind, PackageVersion};
use crate::shell::CommandRunner;

/// Subset of `brew info --json=v2`.
#[derive(Debug, Deserialize)]
struct BrewInfo {
    #[serde(default)]
    formulae: Vec<FormulaInfo>,
    #[serde(default)]
    casks: Vec<CaskInfo>,
}

#[derive(Debug, Deserialize)]
struct FormulaInfo {
    versions: FormulaVersions,
}

#[derive(Debug, Deserialize)]
struct FormulaVersions {
    stable: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CaskInfo {
    version: Option<String>,
}

/// Homebrew formulae and casks.
pub struct BrewBackend<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> BrewBackend<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }
}

impl VersionBackend for BrewBackend<'_> {
    fn kind(&self) -> BackendKind {
        BackendKind::Brew
    }

    fn is_available(&self) -> bool {
        succeeds(self.runner, "brew", &["--version"])
    }

    fn installed_version(&self, package: &str) -> Option<String> {
        let out = query(self.runner, BackendKind::Brew, "brew", &["list", "--versions", package])?;
        parse_list_versions(&out)
    }

    fn latest_version(&self, package: &str) -> Option<String> {
        let out = query(
            self.runner,
            BackendKind::Brew,
            "brew",
            &["info", "--json=v2", package],
        )?;
        parse_info_latest(&out)
    }

    fn install_command(&self, request: &InstallRequest<'_>) -> Vec<String> {
        // The plain formula always lands on the current stable release, so
        // any other version has to come from a versioned formula such as
        // `python@3.11`. When no such formula exists brew fails the install.
        let at_stable = self
            .latest_version(request.package)
            .is_some_and(|stable| compare_versions(&stable, request.version) == Some(Ordering::Equal));
        if !at_stable {
            return vec![
                "brew".to_string(),
                "install".to_string(),
                format!("{}@{}", request.package, request.version),
            ];
        }
        let verb = match request.action {
            ActionKind::Upgrade => "upgrade",
            ActionKind::Install | ActionKind::Downgrade => "install",
        };
        vec!["brew".to_string(), verb.to_string(), request.package.to_string()]
    }

    fn install(&self, request: &InstallRequest<'_>) -> Result<()> {
        let argv = self.install_command(request);
        run_install(self.runner, BackendKind::Brew, request.package, &argv)
    }
}

/// `brew list --versions jq` prints `jq 1.6 1.7.1`; take the newest.
fn parse_list_versions(output: &str) -> Option<String> {
    let line = output.lines().find(|l| !l.trim().is_empty())?;
    line.split_whitespace()
        .skip(1)
        .filter_map(normalize_version)
        .max_by(|a, b| {
            match (PackageVersion::parse(a), PackageVersion::parse(b)) {
                (Some(a), Some(b)) => a.cmp(&b),
                _ => std::cmp::Ordering::Equal,
            }
        })
}

fn parse_info_latest(output: &str) -> Option<String> {
    let info: BrewInfo = match serde_json::from_str(output) {
        Ok(info) => info,
        Err(e) => {
            tracing::debug!(backend = "brew", "unreadable brew info output: {}", e);
            return None;
        }
    };
    info.formulae
        .into_iter()
        .find_map(|f| f.versions.stable)
        .or_else(|| info.casks.into_iter().find_map(|c| c.version))
        .and_then(|v| normalize_version(&v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::ScriptedRunner;

    const INFO_JSON: &str = r#"{"formulae":[{"name":"jq","versions":{"stable":"1.7.1","head":"HEAD","bottle":true}}],"casks":[]}"#;

    #[test]
    fn installed_version_takes_newest_of_several() {
        let runner = ScriptedRunner::new();
        runner.succeed("brew list --versions jq", "jq 1.6 1.7.1\n");
        let brew = BrewBackend::new(&runner);
        assert_eq!(brew.installed_version("jq").as_deref(), Some("1.7.1"));
    }

    #[test]
    fn installed_version_none_when_not_installed() {
        let runner = ScriptedRunner::new();
        runner.fail("brew list --versions jq", 1);
        let brew = BrewBackend::new(&runner);
        assert!(brew.installed_version("jq").is_none());
    }

    #[test]
    fn installed_version_strips_bottle_revision() {
        assert_eq!(parse_list_versions("python@3.11 3.11.6_1").as_deref(), Some("3.11.6"));
    }

    #[test]
    fn latest_version_reads_stable() {
        let runner = ScriptedRunner::new();
        runner.succeed("brew info --json=v2 jq", INFO_JSON);
        let brew = BrewBackend::new(&runner);
        assert_eq!(brew.latest_version("jq").as_deref(), Some("1.7.1"));
    }

    #[test]
    fn latest_version_reads_cask_version() {
        let json = r#"{"formulae":[],"casks":[{"token":"iterm2","version":"3.4.23"}]}"#;
        assert_eq!(parse_info_latest(json).as_deref(), Some("3.4.23"));
    }

    #[test]
    fn latest_version_none_on_garbage() {
        assert!(parse_info_latest("Error: No available formula").is_none());
    }

    #[test]
    fn stable_target_uses_plain_formula() {
        let runner = ScriptedRunner::new();
        runner.succeed("brew info --json=v2 jq", INFO_JSON);
        let brew = BrewBackend::new(&runner);
        let mut request = InstallRequest {
            package: "jq",
            version: "1.7.1",
            action: ActionKind::Install,
            break_system_packages: false,
        };
        assert_eq!(brew.install_command(&request), ["brew", "install", "jq"]);

        request.action = ActionKind::Upgrade;
        assert_eq!(brew.install_command(&request), ["brew", "upgrade", "jq"]);
    }

    #[test]
    fn other_versions_use_versioned_formula() {
        let runner = ScriptedRunner::new();
        runner.succeed("brew info --json=v2 jq", INFO_JSON);
        let brew = BrewBackend::new(&runner);
        for action in [ActionKind::Install, ActionKind::Upgrade, ActionKind::Downgrade] {
            let request = InstallRequest {
                package: "jq",
                version: "1.6",
                action,
                break_system_packages: false,
            };
            assert_eq!(brew.install_command(&request), ["brew", "install", "jq@1.6"]);
        }
    }

    #[test]
    fn unknown_stable_uses_versioned_formula() {
        let runner = ScriptedRunner::new();
        let brew = BrewBackend::new(&runner);
        let request = InstallRequest {
            package: "python",
            version: "3.11",
            action: ActionKind::Install,
            break_system_packages: false,
        };
        assert_eq!(brew.install_command(&request), ["brew", "install", "python@3.11"]);
    }

    #[test]
    fn missing_versioned_formula_fails_the_install() {
        let runner = ScriptedRunner::new();
        runner
            .succeed("brew info --json=v2 jq", INFO_JSON)
            .fail("brew install jq@1.6", 1);
        let brew = BrewBackend::new(&runner);
        let request = InstallRequest {
            package: "jq",
            version: "1.6",
            action: ActionKind::Install,
            break_system_packages: false,
        };
        assert!(brew.install(&request).is_err());
        assert_eq!(runner.calls_starting_with("brew install"), ["brew install jq@1.6"]);
    }

    #[test]
    fn unavailable_when_brew_missing() {
        let runner = ScriptedRunner::new();
        runner.missing_binary("brew");
        let brew = BrewBackend::new(&runner);
        assert!(!brew.is_available());
        assert!(brew.latest_version("jq").is_none());
    }
}
