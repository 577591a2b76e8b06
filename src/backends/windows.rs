//! Windows Package Manager (`winget`) backend.
//!
//! winget is an App Execution Alias, so it is invoked through PowerShell
//! rather than spawned directly. Package ids and versions are quoted
//! before they are spliced into the `-Command` string.

use super::{query, run_install, shell_quote, BackendKind, InstallRequest, VersionBackend};
use crate::error::Result;
use crate::policy::{normalize_version, ActionKind};
use crate::shell::{shell_invocation, CommandRunner, ShellType};

const AGREEMENTS: &str = "--accept-source-agreements";

/// winget through the platform shell.
pub struct WindowsStoreBackend<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> WindowsStoreBackend<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    fn winget(&self, command: &str) -> Option<String> {
        let (program, args) = shell_invocation(ShellType::PowerShell, command);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        query(self.runner, BackendKind::WindowsStore, program, &args)
    }
}

impl VersionBackend for WindowsStoreBackend<'_> {
    fn kind(&self) -> BackendKind {
        BackendKind::WindowsStore
    }

    fn is_available(&self) -> bool {
        self.winget("winget --version").is_some()
    }

    fn installed_version(&self, package: &str) -> Option<String> {
        let out = self.winget(&format!(
            "winget list --id {} --exact {}",
            shell_quote(package),
            AGREEMENTS
        ))?;
        parse_list_version(&out, package)
    }

    fn latest_version(&self, package: &str) -> Option<String> {
        let out = self.winget(&format!(
            "winget show --id {} --exact {}",
            shell_quote(package),
            AGREEMENTS
        ))?;
        parse_show_version(&out)
    }

    fn install_command(&self, request: &InstallRequest<'_>) -> Vec<String> {
        let verb = match request.action {
            ActionKind::Install | ActionKind::Downgrade => "install",
            ActionKind::Upgrade => "upgrade",
        };
        let mut line = format!(
            "winget {} --id {} --exact --version {} --silent --accept-package-agreements {}",
            verb,
            shell_quote(request.package),
            shell_quote(request.version),
            AGREEMENTS
        );
        if request.action == ActionKind::Downgrade {
            line.push_str(" --force");
        }
        let (program, args) = shell_invocation(ShellType::PowerShell, &line);
        std::iter::once(program.to_string()).chain(args).collect()
    }

    fn install(&self, request: &InstallRequest<'_>) -> Result<()> {
        let argv = self.install_command(request);
        run_install(self.runner, BackendKind::WindowsStore, request.package, &argv)
    }
}

/// `winget list` prints a table; the version is the column after the id.
///
/// Columns are located by token rather than by header offset because
/// winget truncates long names with a multi-byte ellipsis.
fn parse_list_version(output: &str, package: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let mut tokens = line.split_whitespace();
        tokens.by_ref().find(|t| t.eq_ignore_ascii_case(package))?;
        tokens.next().and_then(normalize_version)
    })
}

/// `winget show` prints `Version: 3.11.5`.
fn parse_show_version(output: &str) -> Option<String> {
    output
        .lines()
        .find_map(|line| line.trim().strip_prefix("Version:"))
        .and_then(normalize_version)
}
