//! Visual theme and styling.

use console::Style;

use crate::policy::DependencyStatus;

/// Colors and glyphs for terminal output.
#[derive(Debug, Clone)]
pub struct DepkeepTheme {
    /// Success messages and satisfied packages (green).
    pub success: Style,
    /// Warnings and drift (yellow).
    pub warning: Style,
    /// Errors (red bold).
    pub error: Style,
    /// Pending actions (cyan).
    pub info: Style,
    /// Secondary text.
    pub dim: Style,
    pub highlight: Style,
    pub header: Style,
    /// Commands shown to the operator (dim italic).
    pub command: Style,
}

impl Default for DepkeepTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl DepkeepTheme {
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red().bold(),
            info: Style::new().cyan(),
            dim: Style::new().dim(),
            highlight: Style::new().bold(),
            header: Style::new().bold().cyan(),
            command: Style::new().dim().italic(),
        }
    }

    /// A theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            info: Style::new(),
            dim: Style::new(),
            highlight: Style::new(),
            header: Style::new(),
            command: Style::new(),
        }
    }

    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    pub fn format_header(&self, title: &str) -> String {
        format!(
            "{} {}",
            self.header.apply_to("◆"),
            self.highlight.apply_to(title)
        )
    }

    /// Style for a dependency status in tables.
    pub fn status_style(&self, status: DependencyStatus) -> &Style {
        match status {
            DependencyStatus::Matched | DependencyStatus::Upgraded => &self.success,
            DependencyStatus::Outdated | DependencyStatus::Restricted => &self.warning,
            DependencyStatus::Missing => &self.error,
            DependencyStatus::Installing
            | DependencyStatus::Upgrading
            | DependencyStatus::Downgraded
            | DependencyStatus::Adhoc => &self.info,
        }
    }

    pub fn format_status(&self, status: DependencyStatus) -> String {
        format!("{}", self.status_style(status).apply_to(status.as_str()))
    }
}

/// Check if colors should be enabled.
///
/// `--no-color`, `NO_COLOR` (https://no-color.org/) and a non-TTY stdout
/// all disable them.
pub fn should_use_colors(no_color_flag: bool) -> bool {
    if no_color_flag || std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    console::Term::stdout().is_term()
}
