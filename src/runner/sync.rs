//! One evaluation pass over the declared dependencies.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::DepkeepConfig;
use crate::environment::EnvironmentDescriptor;
use crate::error::Result;
use crate::installer::{InstallOutcome, Installer};
use crate::policy::evaluate;
use crate::requirements::{load_requirements, Dependency};
use crate::resolver::Resolver;
use crate::shell::CommandRunner;
use crate::state;

/// Progress events emitted during a pass.
#[derive(Debug)]
pub enum SyncProgress<'a> {
    /// A package is about to be resolved.
    Evaluating {
        package: &'a str,
        index: usize,
        total: usize,
    },
    /// A package reached its final status for this pass.
    Evaluated {
        dependency: &'a Dependency,
        outcome: &'a InstallOutcome,
    },
}

/// Options for a pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Bypass the policy table and install every package at its latest.
    pub adhoc: bool,
    /// Evaluate and write the ledger, but run no install commands.
    pub dry_run: bool,
}

/// A package and what the pass did with it.
#[derive(Debug, Clone)]
pub struct PackageReport {
    pub dependency: Dependency,
    pub outcome: InstallOutcome,
}

/// Result of a pass.
#[derive(Debug)]
pub struct SyncReport {
    pub packages: Vec<PackageReport>,
    pub ledger: PathBuf,
    pub duration: Duration,
}

impl SyncReport {
    /// Packages whose install command failed.
    pub fn failures(&self) -> impl Iterator<Item = &PackageReport> {
        self.packages.iter().filter(|p| p.outcome.is_failure())
    }

    pub fn success(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Runs detect-resolve-evaluate-apply-save for a requirements set.
pub struct SyncRunner<'a> {
    runner: &'a dyn CommandRunner,
    config: &'a DepkeepConfig,
    env: EnvironmentDescriptor,
}

impl<'a> SyncRunner<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        config: &'a DepkeepConfig,
        env: EnvironmentDescriptor,
    ) -> Self {
        Self {
            runner,
            config,
            env,
        }
    }

    /// Run a pass.
    pub fn run(&self, requirements: &Path, ledger: &Path, options: SyncOptions) -> Result<SyncReport> {
        self.run_with_progress(requirements, ledger, options, |_| {})
    }

    /// Run a pass with a progress callback.
    ///
    /// Only a bad requirements file or an unwritable ledger is an error;
    /// backend and install failures are recorded in the report.
    pub fn run_with_progress(
        &self,
        requirements: &Path,
        ledger: &Path,
        options: SyncOptions,
        mut on_progress: impl FnMut(SyncProgress<'_>),
    ) -> Result<SyncReport> {
        let start = Instant::now();
        let dependencies = load_requirements(requirements)?;
        let previous = state::load(ledger);
        tracing::info!(
            requirements = %requirements.display(),
            packages = dependencies.len(),
            "evaluating dependencies"
        );

        let resolver = Resolver::new(self.runner, &self.config.settings.python, &self.env);
        let installer = Installer::new(&resolver, self.env, self.config.forced())
            .dry_run(options.dry_run);

        let total = dependencies.len();
        let mut packages = Vec::with_capacity(total);
        for (index, mut dep) in dependencies.into_iter().enumerate() {
            on_progress(SyncProgress::Evaluating {
                package: &dep.package,
                index,
                total,
            });

            let resolution = resolver.resolve(&dep.package);
            dep.installed = resolution.installed.clone();
            dep.latest = resolution.latest.clone();
            dep.status = evaluate(
                dep.installed.as_deref(),
                &dep.target,
                dep.latest.as_deref(),
                dep.policy,
                options.adhoc,
            );

            match previous.get(&dep.package) {
                Some(before) if before.status != dep.status => tracing::info!(
                    package = %dep.package,
                    "status changed: {} -> {}",
                    before.status,
                    dep.status
                ),
                _ => tracing::debug!(package = %dep.package, status = %dep.status, "evaluated"),
            }

            let outcome = installer.apply(&mut dep, &resolution);
            on_progress(SyncProgress::Evaluated {
                dependency: &dep,
                outcome: &outcome,
            });
            packages.push(PackageReport {
                dependency: dep,
                outcome,
            });
        }

        let final_state: Vec<Dependency> = packages.iter().map(|p| p.dependency.clone()).collect();
        state::save(ledger, &final_state)?;

        Ok(SyncReport {
            packages,
            ledger: ledger.to_path_buf(),
            duration: start.elapsed(),
        })
    }
}
