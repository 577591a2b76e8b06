//! Command-line interface for depkeep.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, CompletionsArgs, EnvArgs, InstalledArgs, SyncArgs};
pub use commands::{Command, CommandContext, CommandDispatcher, CommandResult};
