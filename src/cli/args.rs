//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// depkeep - keep declared packages at the versions their policy asks for.
#[derive(Debug, Parser)]
#[command(name = "depkeep")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (replaces .depkeep/config.yml discovery)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Evaluate every dependency and install what the policy calls for (default)
    Sync(SyncArgs),

    /// Show the recorded ledger without evaluating anything
    Installed(InstalledArgs),

    /// Show the detected environment
    Env(EnvArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `sync` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SyncArgs {
    /// Install even into an externally managed runtime
    #[arg(short, long)]
    pub force: bool,

    /// Ignore policy and install every package at its latest version
    #[arg(long)]
    pub adhoc: bool,

    /// Evaluate and record, but run no install commands
    #[arg(long)]
    pub dry_run: bool,

    /// Requirements file (overrides config)
    #[arg(short, long)]
    pub requirements: Option<PathBuf>,

    /// Ledger file (overrides config)
    #[arg(short, long)]
    pub ledger: Option<PathBuf>,
}

/// Arguments for the `installed` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InstalledArgs {
    /// Ledger file (overrides config)
    #[arg(short, long)]
    pub ledger: Option<PathBuf>,

    /// Print the ledger as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `env` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct EnvArgs {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_is_allowed() {
        let cli = Cli::try_parse_from(["depkeep"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn sync_flags_parse() {
        let cli = Cli::try_parse_from([
            "depkeep",
            "sync",
            "--force",
            "--dry-run",
            "--ledger",
            "state.json",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Sync(args)) => {
                assert!(args.force);
                assert!(args.dry_run);
                assert!(!args.adhoc);
                assert_eq!(args.ledger, Some(PathBuf::from("state.json")));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["depkeep", "installed", "--json", "--debug", "-q"]).unwrap();
        assert!(cli.debug);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Some(Commands::Installed(InstalledArgs { json: true, .. }))));
    }

    #[test]
    fn completions_requires_shell() {
        assert!(Cli::try_parse_from(["depkeep", "completions"]).is_err());
        assert!(Cli::try_parse_from(["depkeep", "completions", "zsh"]).is_ok());
    }
}
