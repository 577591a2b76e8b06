//! Package-manager backends.
//!
//! Each backend answers "what version is installed?" and "what is the
//! latest available version?" for a package, and knows how to install,
//! upgrade or downgrade it.
//!
//! # Modules
//!
//! - [`pip`] - Python's package installer (primary, cross-platform)
//! - [`brew`] - Homebrew
//! - [`linux`] - APT, then DNF
//! - [`windows`] - Windows Package Manager through PowerShell
//!
//! Queries never fail: a missing package, a failing command or an
//! absent binary all come back as `None`, the last two with a warning.

pub mod brew;
pub mod linux;
pub mod pip;
pub mod windows;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{DepkeepError, Result};
use crate::policy::ActionKind;
use crate::shell::{command_line, CommandRunner};

pub use brew::BrewBackend;
pub use linux::AptDnfBackend;
pub use pip::PipBackend;
pub use windows::WindowsStoreBackend;

/// Identifies a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    Pip,
    Brew,
    AptDnf,
    WindowsStore,
}

impl BackendKind {
    /// Short display name.
    pub fn name(&self) -> &'static str {
        match self {
            BackendKind::Pip => "pip",
            BackendKind::Brew => "brew",
            BackendKind::AptDnf => "apt/dnf",
            BackendKind::WindowsStore => "winget",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A request to put `package` at `version`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest<'a> {
    pub package: &'a str,
    pub version: &'a str,
    pub action: ActionKind,
    /// Let pip install into an externally managed interpreter.
    pub break_system_packages: bool,
}

/// Capability interface every package manager implements.
pub trait VersionBackend {
    /// Which backend this is.
    fn kind(&self) -> BackendKind;

    /// Whether the package manager binary is present and responsive.
    fn is_available(&self) -> bool;

    /// The installed version of `package`, if any.
    fn installed_version(&self, package: &str) -> Option<String>;

    /// The newest version of `package` the backend can install, if known.
    fn latest_version(&self, package: &str) -> Option<String>;

    /// The argv that carries out `request`.
    fn install_command(&self, request: &InstallRequest<'_>) -> Vec<String>;

    /// Run the install command for `request`.
    fn install(&self, request: &InstallRequest<'_>) -> Result<()>;

    /// The command an operator should run by hand to carry out `request`.
    fn manual_command(&self, request: &InstallRequest<'_>) -> String {
        self.install_command(request)
            .iter()
            .map(|arg| shell_quote(arg))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Build the backend for `kind`.
pub fn backend_for<'a>(
    kind: BackendKind,
    runner: &'a dyn CommandRunner,
    python: &str,
) -> Box<dyn VersionBackend + 'a> {
    match kind {
        BackendKind::Pip => Box::new(PipBackend::new(runner, python)),
        BackendKind::Brew => Box::new(BrewBackend::new(runner)),
        BackendKind::AptDnf => Box::new(AptDnfBackend::new(runner)),
        BackendKind::WindowsStore => Box::new(WindowsStoreBackend::new(runner)),
    }
}

/// Run a read-only query, returning stdout on success.
pub(crate) fn query(
    runner: &dyn CommandRunner,
    kind: BackendKind,
    program: &str,
    args: &[&str],
) -> Option<String> {
    match runner.run(program, args) {
        Ok(out) if out.success => Some(out.stdout),
        Ok(out) => {
            tracing::debug!(
                backend = %kind,
                command = %command_line(program, args),
                code = ?out.exit_code,
                "query returned nothing"
            );
            None
        }
        Err(DepkeepError::BackendUnavailable { backend }) => {
            tracing::warn!(backend = %kind, "'{}' is not installed", backend);
            None
        }
        Err(e) => {
            tracing::warn!(backend = %kind, "query failed: {}", e);
            None
        }
    }
}

/// Whether a check command exits successfully.
pub(crate) fn succeeds(runner: &dyn CommandRunner, program: &str, args: &[&str]) -> bool {
    runner
        .run(program, args)
        .map(|out| out.success)
        .unwrap_or(false)
}

/// Run an install argv, mapping any failure to [`DepkeepError::InstallFailed`].
pub(crate) fn run_install(
    runner: &dyn CommandRunner,
    kind: BackendKind,
    package: &str,
    argv: &[String],
) -> Result<()> {
    let Some((program, rest)) = argv.split_first() else {
        return Err(DepkeepError::InstallFailed {
            package: package.to_string(),
            message: format!("{} produced an empty command", kind),
        });
    };
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();

    tracing::info!(backend = %kind, package, "running {}", command_line(program, &args));

    let out = runner
        .run(program, &args)
        .map_err(|e| DepkeepError::InstallFailed {
            package: package.to_string(),
            message: e.to_string(),
        })?;

    if out.success {
        return Ok(());
    }

    let detail = out
        .stderr
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .map(|l| l.trim().to_string())
        .unwrap_or_else(|| format!("exit code {:?}", out.exit_code));
    Err(DepkeepError::InstallFailed {
        package: package.to_string(),
        message: detail,
    })
}

/// Quote an argument for a POSIX or PowerShell command line.
///
/// Single quotes are literal in both; an embedded `'` is doubled the
/// PowerShell way.
pub(crate) fn shell_quote(arg: &str) -> String {
    let plain = arg
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "-_.=/:@+,".contains(c));
    if plain && !arg.is_empty() {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', "''"))
    }
}
