//! Env command implementation.
//!
//! The `depkeep env` command prints the detected environment descriptor.

use crate::cli::args::EnvArgs;
use crate::config::CliOverrides;
use crate::environment::{EnvironmentDescriptor, EnvironmentDetector};
use crate::error::{DepkeepError, Result};
use crate::shell::SystemRunner;
use crate::ui::{Table, UserInterface};

use super::dispatcher::{Command, CommandContext, CommandResult};

/// The env command implementation.
pub struct EnvCommand {
    context: CommandContext,
    args: EnvArgs,
}

impl EnvCommand {
    pub fn new(context: CommandContext, args: EnvArgs) -> Self {
        Self { context, args }
    }
}

impl Command for EnvCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = self.context.load_config(&CliOverrides::default())?;
        let runner = SystemRunner::with_timeout_secs(config.settings.command_timeout);
        let env = EnvironmentDetector::new(&runner, &config.settings.python)
            .with_override(config.environment.clone())
            .detect();

        if self.args.json {
            let json =
                serde_json::to_string_pretty(&env).map_err(|e| DepkeepError::Other(e.into()))?;
            println!("{}", json);
        } else {
            ui.show_header("Environment");
            ui.show_table(&environment_table(&env));
        }
        Ok(CommandResult::success())
    }
}

fn environment_table(env: &EnvironmentDescriptor) -> Table {
    let mut table = Table::new(vec!["Property", "Value"]);
    table.add_row(vec!["os".to_string(), env.os.to_string()]);
    table.add_row(vec!["install_method".to_string(), env.install_method.to_string()]);
    table.add_row(vec![
        "externally_managed".to_string(),
        env.externally_managed.to_string(),
    ]);
    table.add_row(vec![
        "backend_available".to_string(),
        env.backend_available.to_string(),
    ]);
    table.add_row(vec!["native_backend".to_string(), env.native_backend().to_string()]);
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::{InstallMethod, Os};

    #[test]
    fn table_lists_every_field() {
        let env = EnvironmentDescriptor {
            os: Os::Linux,
            install_method: InstallMethod::System,
            externally_managed: true,
            backend_available: true,
        };
        let rendered = environment_table(&env).render();
        assert!(rendered.contains("linux"));
        assert!(rendered.contains("system"));
        assert!(rendered.contains("apt/dnf"));
        assert_eq!(rendered.matches("true").count(), 2);
    }
}
