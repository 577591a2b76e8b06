//! Probing the host for an [`EnvironmentDescriptor`].
//!
//! One interpreter query answers both "how was Python installed" and
//! "where is its stdlib"; the PEP 668 marker file is then looked up next
//! to the stdlib. A virtual environment is never externally managed.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use super::{EnvironmentDescriptor, InstallMethod, Os};
use crate::backends::backend_for;
use crate::config::EnvironmentOverride;
use crate::shell::CommandRunner;

/// File whose presence in the stdlib directory marks a runtime as
/// externally managed.
pub const EXTERNALLY_MANAGED_MARKER: &str = "EXTERNALLY-MANAGED";

const INTERPRETER_SCRIPT: &str = "import sys, sysconfig; \
print(getattr(sys, '_base_executable', sys.executable)); \
print(sysconfig.get_path('stdlib')); \
print(sys.prefix != sys.base_prefix)";

const BREW_MARKERS: &[&str] = &["/Cellar/", "/opt/homebrew/", "/linuxbrew/"];

const SYSTEM_PREFIXES: &[&str] = &["/usr/bin/", "/bin/", "/usr/libexec/", "/System/Library/"];

static DETECTED: OnceLock<EnvironmentDescriptor> = OnceLock::new();

/// Run `detector` at most once per process and return the cached result.
pub fn detect_cached(detector: &EnvironmentDetector<'_>) -> EnvironmentDescriptor {
    *DETECTED.get_or_init(|| detector.detect())
}

/// What the interpreter reported about itself.
#[derive(Debug, Clone, PartialEq)]
struct InterpreterInfo {
    executable: String,
    stdlib: PathBuf,
    in_venv: bool,
}

/// Detects the runtime environment through read-only subprocess queries.
///
/// # Example
///
/// ```
/// use depkeep::environment::{EnvironmentDetector, InstallMethod, Os};
/// use depkeep::shell::ScriptedRunner;
///
/// let runner = ScriptedRunner::new();
/// runner.missing_binary("python3");
/// let env = EnvironmentDetector::new(&runner, "python3")
///     .with_os(Os::Linux)
///     .detect();
/// assert_eq!(env.install_method, InstallMethod::Standalone);
/// assert!(!env.externally_managed);
/// ```
pub struct EnvironmentDetector<'a> {
    runner: &'a dyn CommandRunner,
    python: String,
    os: Os,
    overrides: EnvironmentOverride,
    marker_exists: Box<dyn Fn(&Path) -> bool + 'a>,
}

impl<'a> EnvironmentDetector<'a> {
    pub fn new(runner: &'a dyn CommandRunner, python: &str) -> Self {
        Self {
            runner,
            python: python.to_string(),
            os: Os::current(),
            overrides: EnvironmentOverride::default(),
            marker_exists: Box::new(|path: &Path| path.is_file()),
        }
    }

    /// Pretend to run on a different OS.
    pub fn with_os(mut self, os: Os) -> Self {
        self.os = os;
        self
    }

    /// Pin fields instead of probing them.
    pub fn with_override(mut self, overrides: EnvironmentOverride) -> Self {
        self.overrides = overrides;
        self
    }

    /// Replace the filesystem check for the marker file (for testing).
    pub fn with_marker_check<F>(mut self, check: F) -> Self
    where
        F: Fn(&Path) -> bool + 'a,
    {
        self.marker_exists = Box::new(check);
        self
    }

    /// Inspect the host. Never fails; anything unknown falls back to
    /// `standalone` and `false`.
    pub fn detect(&self) -> EnvironmentDescriptor {
        let mut env = EnvironmentDescriptor::fallback(self.os);

        if !self.overrides.pins_interpreter() {
            if let Some(info) = self.query_interpreter() {
                env.install_method = classify_executable(&info.executable);
                env.externally_managed = !info.in_venv
                    && (self.marker_exists)(&info.stdlib.join(EXTERNALLY_MANAGED_MARKER));
            }
        }

        if let Some(method) = self.overrides.install_method {
            env.install_method = method;
        }
        if let Some(managed) = self.overrides.externally_managed {
            env.externally_managed = managed;
        }

        env.backend_available = match self.overrides.backend_available {
            Some(available) => available,
            None => backend_for(env.native_backend(), self.runner, &self.python).is_available(),
        };

        tracing::debug!(
            os = %env.os,
            install_method = %env.install_method,
            externally_managed = env.externally_managed,
            backend_available = env.backend_available,
            "environment detected"
        );
        env
    }

    fn query_interpreter(&self) -> Option<InterpreterInfo> {
        let output = match self.runner.run(&self.python, &["-c", INTERPRETER_SCRIPT]) {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(python = %self.python, "interpreter query failed: {}", e);
                return None;
            }
        };
        let stdout = output.stdout_if_success()?;
        parse_interpreter_report(stdout)
    }
}

fn parse_interpreter_report(stdout: &str) -> Option<InterpreterInfo> {
    let mut lines = stdout.lines().map(str::trim);
    let executable = lines.next().filter(|l| !l.is_empty())?.to_string();
    let stdlib = PathBuf::from(lines.next().filter(|l| !l.is_empty())?);
    let in_venv = lines.next() == Some("True");
    Some(InterpreterInfo {
        executable,
        stdlib,
        in_venv,
    })
}

/// Infer the install method from the interpreter's real path.
fn classify_executable(executable: &str) -> InstallMethod {
    let normalized = executable.replace('\\', "/");
    if normalized.to_ascii_lowercase().contains("/windowsapps/") {
        InstallMethod::MicrosoftStore
    } else if BREW_MARKERS.iter().any(|m| normalized.contains(m)) {
        InstallMethod::Brew
    } else if SYSTEM_PREFIXES.iter().any(|p| normalized.starts_with(p)) {
        InstallMethod::System
    } else {
        InstallMethod::Standalone
    }
}
