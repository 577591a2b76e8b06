//! Sync command implementation.
//!
//! The `depkeep sync` command runs one evaluation pass: detect the
//! environment, resolve and evaluate every declared package, install what
//! the policy calls for and rewrite the ledger.

use crate::cli::args::SyncArgs;
use crate::config::CliOverrides;
use crate::environment::{detect_cached, EnvironmentDetector};
use crate::error::Result;
use crate::installer::InstallOutcome;
use crate::runner::{SyncOptions, SyncReport, SyncRunner};
use crate::shell::SystemRunner;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandContext, CommandResult};
use super::display::dependency_table;

/// Exit code when at least one install failed.
pub const EXIT_INSTALL_FAILED: i32 = 2;

/// The sync command implementation.
pub struct SyncCommand {
    context: CommandContext,
    args: SyncArgs,
}

impl SyncCommand {
    pub fn new(context: CommandContext, args: SyncArgs) -> Self {
        Self { context, args }
    }

    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            force: self.args.force,
            requirements: self.args.requirements.clone(),
            ledger: self.args.ledger.clone(),
        }
    }
}

impl Command for SyncCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = self.context.load_config(&self.overrides())?;
        let root = &self.context.project_root;
        let requirements = config.requirements_path(root);
        let ledger = config.ledger_path(root);

        let runner = SystemRunner::with_timeout_secs(config.settings.command_timeout);
        let detector = EnvironmentDetector::new(&runner, &config.settings.python)
            .with_override(config.environment.clone());
        let env = detect_cached(&detector);

        ui.show_header(if self.args.dry_run {
            "depkeep sync (dry run)"
        } else {
            "depkeep sync"
        });

        let options = SyncOptions {
            adhoc: self.args.adhoc,
            dry_run: self.args.dry_run,
        };
        let report = SyncRunner::new(&runner, &config, env).run(&requirements, &ledger, options)?;

        show_report(ui, &report);
        if report.success() {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(EXIT_INSTALL_FAILED))
        }
    }
}

fn outcome_cell(outcome: &InstallOutcome) -> Option<String> {
    match outcome {
        InstallOutcome::NoAction => None,
        InstallOutcome::Deferred { .. } => Some("manual".to_string()),
        InstallOutcome::DryRun { .. } => Some("dry run".to_string()),
        InstallOutcome::Applied { .. } => Some(outcome.to_string()),
        InstallOutcome::Failed { .. } => Some("failed".to_string()),
    }
}

/// Print the pass results.
pub fn show_report(ui: &mut dyn UserInterface, report: &SyncReport) {
    if report.packages.is_empty() {
        ui.message("No dependencies declared.");
        return;
    }

    let table = dependency_table(
        ui,
        report
            .packages
            .iter()
            .map(|p| (&p.dependency, outcome_cell(&p.outcome))),
        Some("Action"),
    );
    ui.show_table(&table);

    for package in &report.packages {
        match &package.outcome {
            InstallOutcome::Deferred { command } => ui.warning(&format!(
                "{}: runtime is externally managed; run manually or pass --force: {}",
                package.dependency.package, command
            )),
            InstallOutcome::DryRun { command } => {
                ui.message(&format!("would run: {}", command));
            }
            InstallOutcome::Failed { message } => {
                ui.error(&format!("{}: {}", package.dependency.package, message));
            }
            InstallOutcome::NoAction | InstallOutcome::Applied { .. } => {}
        }
    }

    let failed = report.failures().count();
    if failed == 0 {
        ui.success(&format!(
            "{} package{} evaluated in {:.1}s; ledger written to {}",
            report.packages.len(),
            if report.packages.len() == 1 { "" } else { "s" },
            report.duration.as_secs_f64(),
            report.ledger.display()
        ));
    } else {
        ui.error(&format!(
            "{} of {} installs failed; ledger written to {}",
            failed,
            report.packages.len(),
            report.ledger.display()
        ));
    }
}
