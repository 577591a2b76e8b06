//! Platform shell selection for backends that must go through one.
//!
//! The Windows Package Manager is reached through PowerShell so that
//! App Execution Aliases (how `winget` is exposed) resolve the same way
//! they do in an operator's terminal.

/// Shells a command line can be handed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellType {
    PowerShell,
}

impl ShellType {
    /// Executable name for this shell.
    pub fn program(&self) -> &'static str {
        match self {
            ShellType::PowerShell => "powershell",
        }
    }
}

/// Build the program and argument list that runs `command` in `shell`.
pub fn shell_invocation(shell: ShellType, command: &str) -> (&'static str, Vec<String>) {
    let args = match shell {
        ShellType::PowerShell => vec![
            "-NoProfile".to_string(),
            "-NonInteractive".to_string(),
            "-Command".to_string(),
            command.to_string(),
        ],
    };
    (shell.program(), args)
}
