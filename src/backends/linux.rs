//! Linux distribution packages: APT first, then DNF.
//!
//! Queries try the Debian tooling and fall through to the RPM tooling
//! when it has no answer; the first backend that reports a version wins.
//! Installs go through whichever of `apt-get`/`dnf` is present.

use std::cell::OnceCell;

use super::{query, run_install, succeeds, BackendKind, InstallRequest, VersionBackend};
use crate::error::Result;
use crate::policy::{normalize_version, ActionKind};
use crate::shell::CommandRunner;

/// The package tool that will carry out installs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Manager {
    Apt,
    Dnf,
}

/// APT/DNF backend.
pub struct AptDnfBackend<'a> {
    runner: &'a dyn CommandRunner,
    manager: OnceCell<Option<Manager>>,
}

impl<'a> AptDnfBackend<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self {
            runner,
            manager: OnceCell::new(),
        }
    }

    fn manager(&self) -> Option<Manager> {
        *self.manager.get_or_init(|| {
            if succeeds(self.runner, "apt-get", &["--version"]) {
                Some(Manager::Apt)
            } else if succeeds(self.runner, "dnf", &["--version"]) {
                Some(Manager::Dnf)
            } else {
                None
            }
        })
    }

    fn apt_installed(&self, package: &str) -> Option<String> {
        let out = query(
            self.runner,
            BackendKind::AptDnf,
            "dpkg-query",
            &["-W", "-f=${Version}", package],
        )?;
        normalize_version(&out)
    }

    fn rpm_installed(&self, package: &str) -> Option<String> {
        let out = query(
            self.runner,
            BackendKind::AptDnf,
            "rpm",
            &["-q", "--qf", "%{VERSION}", package],
        )?;
        normalize_version(&out)
    }

    fn apt_candidate(&self, package: &str) -> Option<String> {
        let out = query(self.runner, BackendKind::AptDnf, "apt-cache", &["policy", package])?;
        parse_apt_candidate(&out)
    }

    fn dnf_available(&self, package: &str) -> Option<String> {
        let out = query(
            self.runner,
            BackendKind::AptDnf,
            "dnf",
            &["info", "--available", package],
        )?;
        parse_dnf_version(&out)
    }
}

impl VersionBackend for AptDnfBackend<'_> {
    fn kind(&self) -> BackendKind {
        BackendKind::AptDnf
    }

    fn is_available(&self) -> bool {
        self.manager().is_some()
    }

    fn installed_version(&self, package: &str) -> Option<String> {
        self.apt_installed(package)
            .or_else(|| self.rpm_installed(package))
    }

    fn latest_version(&self, package: &str) -> Option<String> {
        self.apt_candidate(package)
            .or_else(|| self.dnf_available(package))
    }

    fn install_command(&self, request: &InstallRequest<'_>) -> Vec<String> {
        let package = request.package;
        let version = request.version;
        match self.manager() {
            Some(Manager::Dnf) => {
                let verb = match request.action {
                    ActionKind::Install => "install",
                    ActionKind::Upgrade => "upgrade",
                    ActionKind::Downgrade => "downgrade",
                };
                vec![
                    "dnf".to_string(),
                    verb.to_string(),
                    "-y".to_string(),
                    format!("{}-{}", package, version),
                ]
            }
            // Default to apt-get when neither is detected, so the manual
            // command shown to the operator is still meaningful.
            Some(Manager::Apt) | None => {
                let mut argv = vec!["apt-get".to_string(), "install".to_string(), "-y".to_string()];
                if request.action == ActionKind::Downgrade {
                    argv.push("--allow-downgrades".to_string());
                }
                // Distribution revisions follow the upstream version, so
                // match them with a glob.
                argv.push(format!("{}={}*", package, version));
                argv
            }
        }
    }

    fn install(&self, request: &InstallRequest<'_>) -> Result<()> {
        let argv = self.install_command(request);
        run_install(self.runner, BackendKind::AptDnf, request.package, &argv)
    }
}

/// `apt-cache policy` prints `  Candidate: 2.28.1+dfsg-1`, or `(none)`.
fn parse_apt_candidate(output: &str) -> Option<String> {
    output
        .lines()
        .find_map(|line| line.trim().strip_prefix("Candidate:"))
        .map(str::trim)
        .filter(|v| *v != "(none)")
        .and_then(normalize_version)
}

/// `dnf info` prints `Version      : 2.28.1`; with several repos the
/// first block is the newest.
fn parse_dnf_version(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        if key.trim() == "Version" {
            normalize_version(value)
        } else {
            None
        }
    })
}
