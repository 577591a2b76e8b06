//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait and is routed by
//! [`CommandDispatcher`]. Every command starts from the same resolved
//! configuration via [`CommandContext`].

pub mod completions;
pub mod dispatcher;
pub mod display;
pub mod env;
pub mod installed;
pub mod sync;

pub use dispatcher::{Command, CommandContext, CommandDispatcher, CommandResult};
