//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandContext`] for the config every command starts from
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands, SyncArgs};
use crate::config::{
    apply_cli_overrides, apply_env_overrides, load_config, CliOverrides, DepkeepConfig,
};
use crate::error::Result;
use crate::ui::UserInterface;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Where a command runs and which config file, if any, was forced.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub project_root: PathBuf,
    pub config_path: Option<PathBuf>,
}

impl CommandContext {
    pub fn new(project_root: PathBuf, config_path: Option<PathBuf>) -> Self {
        Self {
            project_root,
            config_path,
        }
    }

    /// Load config files, then apply `DEPKEEP_*` variables, then `cli`.
    ///
    /// The result is fixed for the rest of the command.
    pub fn load_config(&self, cli: &CliOverrides) -> Result<DepkeepConfig> {
        let mut config = load_config(&self.project_root, self.config_path.as_deref())?;
        apply_env_overrides(&mut config);
        apply_cli_overrides(&mut config, cli);
        tracing::debug!(?config, "configuration resolved");
        Ok(config)
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    context: CommandContext,
}

impl CommandDispatcher {
    pub fn new(project_root: PathBuf, config_path: Option<PathBuf>) -> Self {
        Self {
            context: CommandContext::new(project_root, config_path),
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.context.project_root
    }

    /// Route the CLI subcommand to its implementation and execute it.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Some(Commands::Sync(args)) => {
                let cmd = super::sync::SyncCommand::new(self.context.clone(), args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Installed(args)) => {
                let cmd =
                    super::installed::InstalledCommand::new(self.context.clone(), args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Env(args)) => {
                let cmd = super::env::EnvCommand::new(self.context.clone(), args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Completions(args)) => {
                let cmd = super::completions::CompletionsCommand::new(args.clone());
                cmd.execute(ui)
            }
            None => {
                let cmd = super::sync::SyncCommand::new(self.context.clone(), SyncArgs::default());
                cmd.execute(ui)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn command_result_codes() {
        assert_eq!(CommandResult::success().exit_code, 0);
        let failure = CommandResult::failure(2);
        assert!(!failure.success);
        assert_eq!(failure.exit_code, 2);
    }

    #[test]
    fn dispatcher_keeps_project_root() {
        let dispatcher = CommandDispatcher::new(PathBuf::from("/test"), None);
        assert_eq!(dispatcher.project_root(), Path::new("/test"));
    }

    #[test]
    fn context_applies_cli_last() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".depkeep");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.yml"), "packages:\n  installed: from-config.json\n").unwrap();

        let context = CommandContext::new(temp.path().to_path_buf(), None);
        let config = context
            .load_config(&CliOverrides {
                ledger: Some(PathBuf::from("from-cli.json")),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(config.packages.installed, PathBuf::from("from-cli.json"));
    }
}
