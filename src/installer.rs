//! Carrying out planned actions.
//!
//! An externally managed runtime is never touched unless installs are
//! forced; the operator gets the command to run by hand instead. A failed
//! install is logged and leaves the dependency's status as evaluated.

use std::cmp::Ordering;
use std::fmt;

use crate::backends::{BackendKind, InstallRequest};
use crate::environment::EnvironmentDescriptor;
use crate::policy::{compare_versions, plan, PlannedAction};
use crate::requirements::Dependency;
use crate::resolver::{Resolution, Resolver};

/// What happened when the installer looked at one dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The status calls for no action.
    NoAction,
    /// Blocked by the externally-managed gate; `command` is for the operator.
    Deferred { command: String },
    /// Dry run; `command` would have been executed.
    DryRun { command: String },
    /// The command succeeded and the re-queried version, if readable,
    /// matches the planned one.
    Applied {
        action: PlannedAction,
        backend: BackendKind,
        installed: Option<String>,
    },
    Failed { message: String },
}

impl InstallOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, InstallOutcome::Failed { .. })
    }
}

impl fmt::Display for InstallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallOutcome::NoAction => f.write_str("no action"),
            InstallOutcome::Deferred { command } => write!(f, "manual: {}", command),
            InstallOutcome::DryRun { command } => write!(f, "would run: {}", command),
            InstallOutcome::Applied { action, installed, .. } => write!(
                f,
                "{} {}",
                action.kind.verb(),
                installed.as_deref().unwrap_or(&action.version)
            ),
            InstallOutcome::Failed { message } => write!(f, "failed: {}", message),
        }
    }
}

/// Applies planned actions through the resolver's backends.
pub struct Installer<'r, 'b> {
    resolver: &'r Resolver<'b>,
    env: EnvironmentDescriptor,
    force: bool,
    dry_run: bool,
}

impl<'r, 'b> Installer<'r, 'b> {
    /// `force` lets installs proceed on an externally managed runtime.
    pub fn new(resolver: &'r Resolver<'b>, env: EnvironmentDescriptor, force: bool) -> Self {
        Self {
            resolver,
            env,
            force,
            dry_run: false,
        }
    }

    /// Report commands instead of running them.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Execute at most one install/upgrade/downgrade for `dep`.
    ///
    /// On success `dep.installed` is refreshed from the backend; a failed
    /// re-query keeps the previous value. A backend that reports success
    /// but leaves a different version behind is a failure.
    pub fn apply(&self, dep: &mut Dependency, resolution: &Resolution) -> InstallOutcome {
        let Some(action) = plan(dep.status, dep.policy, &dep.target, dep.latest.as_deref()) else {
            tracing::debug!(package = %dep.package, status = %dep.status, "no action required");
            return InstallOutcome::NoAction;
        };

        let backend = self.resolver.installer_for(resolution);
        let request = InstallRequest {
            package: &dep.package,
            version: &action.version,
            action: action.kind,
            break_system_packages: self.env.externally_managed
                && self.force
                && backend.kind() == BackendKind::Pip,
        };

        if self.env.externally_managed && !self.force {
            let command = backend.manual_command(&request);
            tracing::info!(
                package = %dep.package,
                backend = %backend.kind(),
                "environment is externally managed; to {} run: {}",
                action.kind,
                command
            );
            return InstallOutcome::Deferred { command };
        }

        if self.dry_run {
            let command = backend.manual_command(&request);
            tracing::info!(package = %dep.package, "dry run: {}", command);
            return InstallOutcome::DryRun { command };
        }

        if let Err(e) = backend.install(&request) {
            tracing::error!(package = %dep.package, backend = %backend.kind(), "{}", e);
            return InstallOutcome::Failed {
                message: e.to_string(),
            };
        }

        let installed = backend.installed_version(&dep.package);
        match &installed {
            Some(version) => dep.installed = Some(version.clone()),
            None => tracing::warn!(
                package = %dep.package,
                "installed, but the new version could not be read back"
            ),
        }

        if let Some(version) = installed.as_deref() {
            if compare_versions(version, &action.version) != Some(Ordering::Equal) {
                let message = format!(
                    "requested {} but {} is installed",
                    action.version, version
                );
                tracing::error!(package = %dep.package, backend = %backend.kind(), "{}", message);
                return InstallOutcome::Failed { message };
            }
        }

        tracing::info!(
            package = %dep.package,
            installed = ?dep.installed,
            "{} complete",
            action.kind
        );

        InstallOutcome::Applied {
            backend: backend.kind(),
            action,
            installed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::{InstallMethod, Os};
    use crate::policy::{ActionKind, DependencyStatus, Policy};
    use crate::shell::ScriptedRunner;

    fn env(externally_managed: bool) -> EnvironmentDescriptor {
        EnvironmentDescriptor {
            os: Os::Linux,
            install_method: InstallMethod::System,
            externally_managed,
            backend_available: false,
        }
    }

    fn missing(package: &str, target: &str) -> Dependency {
        let mut dep = Dependency::new(package, Policy::Latest, target);
        dep.status = DependencyStatus::Installing;
        dep
    }

    fn pip_resolution() -> Resolution {
        Resolution {
            source: Some(BackendKind::Pip),
            ..Default::default()
        }
    }

    #[test]
    fn installs_and_refreshes_installed_version() {
        let runner = ScriptedRunner::new();
        runner.succeed("python3 -m pip install requests==2.26.0", "");
        runner.succeed("python3 -m pip show requests", "Version: 2.26.0\n");
        let resolver = Resolver::new(&runner, "python3", &env(false));
        let mut dep = missing("requests", "2.26.0");

        let outcome = Installer::new(&resolver, env(false), false).apply(&mut dep, &pip_resolution());

        assert!(matches!(outcome, InstallOutcome::Applied { .. }));
        assert_eq!(dep.installed.as_deref(), Some("2.26.0"));
        assert_eq!(dep.status, DependencyStatus::Installing);
    }

    #[test]
    fn externally_managed_without_force_runs_nothing() {
        let runner = ScriptedRunner::new();
        let resolver = Resolver::new(&runner, "python3", &env(true));

        for status in DependencyStatus::ALL {
            let mut dep = missing("requests", "2.26.0");
            dep.installed = Some("1.0.0".into());
            dep.status = status;
            let outcome = Installer::new(&resolver, env(true), false).apply(&mut dep, &pip_resolution());
            if status.requires_action() {
                assert!(matches!(outcome, InstallOutcome::Deferred { .. }));
            }
            assert_eq!(dep.status, status);
        }

        assert!(runner.calls().is_empty());
    }

    #[test]
    fn deferred_command_is_the_manual_install() {
        let runner = ScriptedRunner::new();
        let resolver = Resolver::new(&runner, "python3", &env(true));
        let mut dep = missing("requests", "2.26.0");

        let outcome = Installer::new(&resolver, env(true), false).apply(&mut dep, &pip_resolution());

        assert_eq!(
            outcome,
            InstallOutcome::Deferred {
                command: "python3 -m pip install requests==2.26.0".to_string()
            }
        );
    }

    #[test]
    fn force_adds_break_system_packages() {
        let runner = ScriptedRunner::new();
        runner.succeed(
            "python3 -m pip install requests==2.26.0 --break-system-packages",
            "",
        );
        let resolver = Resolver::new(&runner, "python3", &env(true));
        let mut dep = missing("requests", "2.26.0");

        let outcome = Installer::new(&resolver, env(true), true).apply(&mut dep, &pip_resolution());

        assert!(!outcome.is_failure());
        assert!(runner.was_called("python3 -m pip install requests==2.26.0 --break-system-packages"));
    }

    #[test]
    fn failure_keeps_status_and_installed() {
        let runner = ScriptedRunner::new();
        runner.fail("python3 -m pip install requests==2.26.0", 1);
        let resolver = Resolver::new(&runner, "python3", &env(false));
        let mut dep = missing("requests", "2.26.0");

        let outcome = Installer::new(&resolver, env(false), false).apply(&mut dep, &pip_resolution());

        assert!(outcome.is_failure());
        assert_eq!(dep.status, DependencyStatus::Installing);
        assert!(dep.installed.is_none());
    }

    #[test]
    fn log_only_statuses_run_nothing() {
        let runner = ScriptedRunner::new();
        let resolver = Resolver::new(&runner, "python3", &env(false));
        for status in [DependencyStatus::Matched, DependencyStatus::Restricted] {
            let mut dep = missing("requests", "2.26.0");
            dep.status = status;
            let outcome = Installer::new(&resolver, env(false), false).apply(&mut dep, &pip_resolution());
            assert_eq!(outcome, InstallOutcome::NoAction);
        }
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn dry_run_reports_without_running() {
        let runner = ScriptedRunner::new();
        let resolver = Resolver::new(&runner, "python3", &env(false));
        let mut dep = missing("requests", "2.26.0");
        dep.latest = Some("2.28.0".into());

        let outcome = Installer::new(&resolver, env(false), false)
            .dry_run(true)
            .apply(&mut dep, &pip_resolution());

        assert_eq!(
            outcome,
            InstallOutcome::DryRun {
                command: "python3 -m pip install requests==2.28.0".to_string()
            }
        );
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn downgrade_goes_to_target() {
        let runner = ScriptedRunner::new();
        runner.succeed("python3 -m pip install requests==2.26.0", "");
        let resolver = Resolver::new(&runner, "python3", &env(false));
        let mut dep = Dependency::new("requests", Policy::Restricted, "2.26.0");
        dep.installed = Some("2.28.0".into());
        dep.status = DependencyStatus::Downgraded;

        let outcome = Installer::new(&resolver, env(false), false).apply(&mut dep, &pip_resolution());

        match outcome {
            InstallOutcome::Applied { action, .. } => {
                assert_eq!(action.kind, ActionKind::Downgrade);
                assert_eq!(action.version, "2.26.0");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        // re-query was unscripted, so the previous value stays
        assert_eq!(dep.installed.as_deref(), Some("2.28.0"));
    }

    #[test]
    fn applied_reports_the_requeried_version() {
        let runner = ScriptedRunner::new();
        runner
            .succeed("python3 -m pip install requests==2.28.0", "")
            .succeed("python3 -m pip show requests", "Version: 2.28.0\n");
        let resolver = Resolver::new(&runner, "python3", &env(false));
        let mut dep = missing("requests", "2.26.0");
        dep.latest = Some("2.28.0".into());

        let outcome = Installer::new(&resolver, env(false), false).apply(&mut dep, &pip_resolution());

        assert_eq!(outcome.to_string(), "install 2.28.0");
        match outcome {
            InstallOutcome::Applied { installed, .. } => {
                assert_eq!(installed.as_deref(), Some("2.28.0"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn different_version_after_install_is_a_failure() {
        let runner = ScriptedRunner::new();
        runner
            .succeed("python3 -m pip install requests==2.26.0", "")
            .succeed("python3 -m pip show requests", "Version: 2.28.0\n");
        let resolver = Resolver::new(&runner, "python3", &env(false));
        let mut dep = Dependency::new("requests", Policy::Restricted, "2.26.0");
        dep.status = DependencyStatus::Installing;

        let outcome = Installer::new(&resolver, env(false), false).apply(&mut dep, &pip_resolution());

        assert_eq!(
            outcome,
            InstallOutcome::Failed {
                message: "requested 2.26.0 but 2.28.0 is installed".to_string()
            }
        );
        assert_eq!(dep.installed.as_deref(), Some("2.28.0"));
        assert_eq!(dep.status, DependencyStatus::Installing);
    }
}
