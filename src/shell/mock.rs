//! Scripted command runner for testing.
//!
//! `ScriptedRunner` implements [`CommandRunner`] by looking up the full
//! command line in a table of canned responses, and records every
//! invocation for later assertion.
//!
//! # Example
//!
//! ```
//! use depkeep::shell::{CommandRunner, ScriptedRunner};
//!
//! let runner = ScriptedRunner::new();
//! runner.succeed("brew list --versions jq", "jq 1.7.1\n");
//!
//! let out = runner.run("brew", &["list", "--versions", "jq"]).unwrap();
//! assert_eq!(out.stdout_if_success(), Some("jq 1.7.1"));
//! assert_eq!(runner.calls(), vec!["brew list --versions jq".to_string()]);
//! ```

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;

use super::command::{command_line, CommandOutput, CommandRunner};
use crate::error::{DepkeepError, Result};

/// Command runner that answers from a script instead of spawning processes.
///
/// Responses queued for the same command line are returned in order; the
/// last one stays in place and answers every later call. Command lines
/// with no scripted response fail with exit code 1 and no output, which
/// every backend reads as "not found".
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    responses: RefCell<HashMap<String, VecDeque<CommandOutput>>>,
    missing: RefCell<HashSet<String>>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedRunner {
    /// Create an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response with the given stdout.
    pub fn succeed(&self, command: &str, stdout: &str) -> &Self {
        self.respond(command, CommandOutput::success(stdout, "", Duration::ZERO))
    }

    /// Queue a failing response with the given exit code.
    pub fn fail(&self, command: &str, code: i32) -> &Self {
        self.respond(
            command,
            CommandOutput::failure(Some(code), "", "scripted failure", Duration::ZERO),
        )
    }

    /// Queue an arbitrary response.
    pub fn respond(&self, command: &str, output: CommandOutput) -> &Self {
        self.responses
            .borrow_mut()
            .entry(command.to_string())
            .or_default()
            .push_back(output);
        self
    }

    /// Treat `program` as absent from the system.
    pub fn missing_binary(&self, program: &str) -> &Self {
        self.missing.borrow_mut().insert(program.to_string());
        self
    }

    /// Every command line run so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Command lines run so far that start with `prefix`.
    pub fn calls_starting_with(&self, prefix: &str) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .cloned()
            .collect()
    }

    /// Whether a command line starting with `prefix` was run.
    pub fn was_called(&self, prefix: &str) -> bool {
        !self.calls_starting_with(prefix).is_empty()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let line = command_line(program, args);
        self.calls.borrow_mut().push(line.clone());

        if self.missing.borrow().contains(program) {
            return Err(DepkeepError::BackendUnavailable {
                backend: program.to_string(),
            });
        }

        let mut responses = self.responses.borrow_mut();
        let Some(queue) = responses.get_mut(&line) else {
            return Ok(CommandOutput::failure(Some(1), "", "", Duration::ZERO));
        };

        let output = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        Ok(output.unwrap_or_else(|| CommandOutput::failure(Some(1), "", "", Duration::ZERO)))
    }
}
