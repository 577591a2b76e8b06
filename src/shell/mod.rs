//! Subprocess execution.
//!
//! Every backend query and install goes through a [`CommandRunner`] so
//! the engine can be driven against a [`ScriptedRunner`] in tests.

pub mod command;
pub mod mock;
pub mod platform;

pub use command::{command_line, CommandOutput, CommandRunner, SystemRunner};
pub use mock::ScriptedRunner;
pub use platform::{shell_invocation, ShellType};
