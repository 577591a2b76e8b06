//! Installed command implementation.
//!
//! The `depkeep installed` command prints the ledger as last written, in
//! the order it was written. It never resolves versions or evaluates policy.

use crate::cli::args::InstalledArgs;
use crate::config::CliOverrides;
use crate::error::{DepkeepError, Result};
use crate::requirements::{Dependency, DependencyDocument, DependencyRecord};
use crate::state;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandContext, CommandResult};
use super::display::dependency_table;

/// The installed command implementation.
pub struct InstalledCommand {
    context: CommandContext,
    args: InstalledArgs,
}

impl InstalledCommand {
    pub fn new(context: CommandContext, args: InstalledArgs) -> Self {
        Self { context, args }
    }
}

impl Command for InstalledCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = self.context.load_config(&CliOverrides {
            ledger: self.args.ledger.clone(),
            ..Default::default()
        })?;
        let path = config.ledger_path(&self.context.project_root);
        let entries = state::load_in_order(&path);

        if self.args.json {
            let json = serde_json::to_string_pretty(&ledger_document(&entries))
                .map_err(|e| DepkeepError::Other(e.into()))?;
            println!("{}", json);
            return Ok(CommandResult::success());
        }

        if entries.is_empty() {
            ui.message(&format!("No packages recorded in {}", path.display()));
            return Ok(CommandResult::success());
        }

        ui.show_header("Installed packages");
        let table = dependency_table(ui, entries.iter().map(|dep| (dep, None)), None);
        ui.show_table(&table);
        Ok(CommandResult::success())
    }
}

fn ledger_document(entries: &[Dependency]) -> DependencyDocument {
    DependencyDocument {
        dependencies: entries.iter().map(DependencyRecord::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{DependencyStatus, Policy};
    use crate::ui::MockUI;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn context(temp: &TempDir) -> CommandContext {
        CommandContext::new(temp.path().to_path_buf(), None)
    }

    #[test]
    fn empty_ledger_says_so() {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();

        let result = InstalledCommand::new(context(&temp), InstalledArgs::default())
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        assert!(ui.has_message("No packages recorded"));
    }

    #[test]
    fn lists_recorded_packages() {
        let temp = TempDir::new().unwrap();
        let ledger = temp.path().join("ledger.json");
        let mut dep = Dependency::new("requests", Policy::Latest, "2.26.0");
        dep.installed = Some("2.26.0".into());
        dep.latest = Some("2.28.0".into());
        dep.status = DependencyStatus::Outdated;
        state::save(&ledger, &[dep]).unwrap();

        let mut ui = MockUI::new();
        InstalledCommand::new(
            context(&temp),
            InstalledArgs {
                ledger: Some(PathBuf::from("ledger.json")),
                json: false,
            },
        )
        .execute(&mut ui)
        .unwrap();

        assert_eq!(ui.tables().len(), 1);
        assert!(ui.tables()[0].contains("outdated"));
        assert!(ui.tables()[0].contains("2.28.0"));
    }

    #[test]
    fn keeps_ledger_order_instead_of_sorting() {
        let temp = TempDir::new().unwrap();
        let ledger = temp.path().join("ledger.json");
        let zlib = Dependency::new("zlib", Policy::Latest, "1.3.1");
        let attrs = Dependency::new("attrs", Policy::Latest, "23.1.0");
        state::save(&ledger, &[zlib, attrs]).unwrap();

        let entries = state::load_in_order(&ledger);
        let document = ledger_document(&entries);
        assert_eq!(document.dependencies[0].package, "zlib");
        assert_eq!(document.dependencies[1].package, "attrs");

        let mut ui = MockUI::new();
        InstalledCommand::new(
            context(&temp),
            InstalledArgs {
                ledger: Some(PathBuf::from("ledger.json")),
                json: false,
            },
        )
        .execute(&mut ui)
        .unwrap();

        let table = &ui.tables()[0];
        let zlib_at = table.find("zlib").unwrap();
        let attrs_at = table.find("attrs").unwrap();
        assert!(zlib_at < attrs_at);
    }
}
