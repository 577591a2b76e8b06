//! Operator-facing output.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for the real terminal
//! - [`MockUI`] for tests
//! - [`Table`] for box-drawn tables
//!
//! Diagnostics go through `tracing`; this is for results the operator
//! asked to see.
//!
//! # Example
//!
//! ```
//! use depkeep::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.show_header("depkeep");
//! ui.success("2 packages up to date");
//! assert!(ui.has_success("2 packages up to date"));
//! ```

pub mod mock;
pub mod output;
pub mod table;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use output::OutputMode;
pub use table::Table;
pub use terminal::TerminalUI;
pub use theme::{should_use_colors, DepkeepTheme};

use crate::policy::DependencyStatus;

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a plain line.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message. Shown even in quiet mode.
    fn warning(&mut self, msg: &str);

    /// Display an error message. Always shown.
    fn error(&mut self, msg: &str);

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Render a table.
    fn show_table(&mut self, table: &Table);

    /// Whether stdout is an interactive terminal.
    fn is_interactive(&self) -> bool;

    /// Render a dependency status for display.
    fn format_status(&self, status: DependencyStatus) -> String {
        status.as_str().to_string()
    }
}
