//! Pip backend.
//!
//! Always driven as `<python> -m pip` so the interpreter the environment
//! detector inspected is the one whose site-packages gets queried.

use regex::Regex;
use std::sync::LazyLock;

use super::{query, run_install, succeeds, BackendKind, InstallRequest, VersionBackend};
use crate::error::Result;
use crate::policy::{normalize_version, ActionKind};
use crate::shell::CommandRunner;

/// First line of `pip index versions`: `requests (2.28.0)`.
static INDEX_HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\S+\s+\(([^)]+)\)\s*$").expect("INDEX_HEADER_REGEX must compile")
});

/// Pip via a specific Python interpreter.
pub struct PipBackend<'a> {
    runner: &'a dyn CommandRunner,
    python: String,
}

impl<'a> PipBackend<'a> {
    /// Create a pip backend for `python` (e.g. `python3`).
    pub fn new(runner: &'a dyn CommandRunner, python: &str) -> Self {
        Self {
            runner,
            python: python.to_string(),
        }
    }

    fn pip(&self, args: &[&str]) -> Option<String> {
        let mut full = vec!["-m", "pip"];
        full.extend_from_slice(args);
        query(self.runner, BackendKind::Pip, &self.python, &full)
    }
}

impl VersionBackend for PipBackend<'_> {
    fn kind(&self) -> BackendKind {
        BackendKind::Pip
    }

    fn is_available(&self) -> bool {
        succeeds(self.runner, &self.python, &["-m", "pip", "--version"])
    }

    fn installed_version(&self, package: &str) -> Option<String> {
        let out = self.pip(&["show", package])?;
        parse_show_version(&out)
    }

    fn latest_version(&self, package: &str) -> Option<String> {
        let out = self.pip(&["index", "versions", package])?;
        parse_index_latest(&out)
    }

    fn install_command(&self, request: &InstallRequest<'_>) -> Vec<String> {
        let mut argv = vec![
            self.python.clone(),
            "-m".to_string(),
            "pip".to_string(),
            "install".to_string(),
        ];
        if request.action == ActionKind::Upgrade {
            argv.push("--upgrade".to_string());
        }
        argv.push(format!("{}=={}", request.package, request.version));
        if request.break_system_packages {
            argv.push("--break-system-packages".to_string());
        }
        argv
    }

    fn install(&self, request: &InstallRequest<'_>) -> Result<()> {
        let argv = self.install_command(request);
        run_install(self.runner, BackendKind::Pip, request.package, &argv)
    }
}

/// Pull `Version:` out of `pip show` output.
fn parse_show_version(output: &str) -> Option<String> {
    output
        .lines()
        .find_map(|line| line.strip_prefix("Version:"))
        .and_then(normalize_version)
}

/// Pull the newest version out of `pip index versions` output.
fn parse_index_latest(output: &str) -> Option<String> {
    if let Some(caps) = INDEX_HEADER_REGEX.captures(output) {
        return caps.get(1).and_then(|m| normalize_version(m.as_str()));
    }
    output
        .lines()
        .find_map(|line| line.trim().strip_prefix("LATEST:"))
        .and_then(normalize_version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::ScriptedRunner;

    const SHOW_OUTPUT: &str = "Name: requests\nVersion: 2.26.0\nSummary: Python HTTP for Humans.\nLocation: /usr/lib/python3/dist-packages\n";

    const INDEX_OUTPUT: &str = "requests (2.28.0)\nAvailable versions: 2.28.0, 2.27.1, 2.26.0\n  INSTALLED: 2.26.0\n  LATEST:    2.28.0\n";

    fn request(action: ActionKind, break_system_packages: bool) -> InstallRequest<'static> {
        InstallRequest {
            package: "requests",
            version: "2.28.0",
            action,
            break_system_packages,
        }
    }

    #[test]
    fn installed_version_parses_pip_show() {
        let runner = ScriptedRunner::new();
        runner.succeed("python3 -m pip show requests", SHOW_OUTPUT);
        let pip = PipBackend::new(&runner, "python3");
        assert_eq!(pip.installed_version("requests").as_deref(), Some("2.26.0"));
    }

    #[test]
    fn installed_version_none_when_not_installed() {
        let runner = ScriptedRunner::new();
        runner.fail("python3 -m pip show requests", 1);
        let pip = PipBackend::new(&runner, "python3");
        assert!(pip.installed_version("requests").is_none());
    }

    #[test]
    fn latest_version_parses_index_header() {
        let runner = ScriptedRunner::new();
        runner.succeed("python3 -m pip index versions requests", INDEX_OUTPUT);
        let pip = PipBackend::new(&runner, "python3");
        assert_eq!(pip.latest_version("requests").as_deref(), Some("2.28.0"));
    }

    #[test]
    fn latest_version_falls_back_to_latest_line() {
        assert_eq!(
            parse_index_latest("WARNING: experimental\n  LATEST:    1.4.2\n").as_deref(),
            Some("1.4.2")
        );
    }

    #[test]
    fn latest_version_none_on_network_failure() {
        let runner = ScriptedRunner::new();
        let pip = PipBackend::new(&runner, "python3");
        assert!(pip.latest_version("requests").is_none());
    }

    #[test]
    fn missing_interpreter_is_none_not_error() {
        let runner = ScriptedRunner::new();
        runner.missing_binary("python3");
        let pip = PipBackend::new(&runner, "python3");
        assert!(pip.installed_version("requests").is_none());
        assert!(!pip.is_available());
    }

    #[test]
    fn install_command_pins_version() {
        let runner = ScriptedRunner::new();
        let pip = PipBackend::new(&runner, "python3");
        assert_eq!(
            pip.install_command(&request(ActionKind::Install, false)),
            ["python3", "-m", "pip", "install", "requests==2.28.0"]
        );
    }

    #[test]
    fn upgrade_adds_upgrade_flag() {
        let runner = ScriptedRunner::new();
        let pip = PipBackend::new(&runner, "python3");
        let argv = pip.install_command(&request(ActionKind::Upgrade, false));
        assert!(argv.contains(&"--upgrade".to_string()));
    }

    #[test]
    fn break_system_packages_is_appended() {
        let runner = ScriptedRunner::new();
        let pip = PipBackend::new(&runner, "python3");
        let argv = pip.install_command(&request(ActionKind::Downgrade, true));
        assert_eq!(argv.last().map(String::as_str), Some("--break-system-packages"));
    }

    #[test]
    fn install_runs_command() {
        let runner = ScriptedRunner::new();
        runner.succeed("python3 -m pip install requests==2.28.0", "");
        let pip = PipBackend::new(&runner, "python3");
        pip.install(&request(ActionKind::Install, false)).unwrap();
        assert!(runner.was_called("python3 -m pip install requests==2.28.0"));
    }

    #[test]
    fn manual_command_is_copy_pasteable() {
        let runner = ScriptedRunner::new();
        let pip = PipBackend::new(&runner, "python3");
        assert_eq!(
            pip.manual_command(&request(ActionKind::Install, true)),
            "python3 -m pip install requests==2.28.0 --break-system-packages"
        );
    }
}
