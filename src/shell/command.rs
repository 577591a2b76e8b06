//! Subprocess execution with an optional timeout.

use crate::error::{DepkeepError, Result};
use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// How often a running child is polled while a timeout is armed.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Result of executing a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandOutput {
    /// Create a success result.
    pub fn success(stdout: impl Into<String>, stderr: impl Into<String>, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: stderr.into(),
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
            duration,
            success: false,
        }
    }

    /// Stdout if the command succeeded and printed something.
    pub fn stdout_if_success(&self) -> Option<&str> {
        let out = self.stdout.trim();
        (self.success && !out.is_empty()).then_some(out)
    }
}

/// Runs a program with arguments, without an intermediate shell.
///
/// Resolvers and the installer only talk to the system through this
/// trait, so tests can substitute a [`ScriptedRunner`](super::ScriptedRunner).
pub trait CommandRunner {
    /// Run `program` with `args` and capture its output.
    ///
    /// A non-zero exit is returned as `Ok` with `success == false`.
    /// Errors are reserved for "could not run at all": the binary is
    /// absent ([`DepkeepError::BackendUnavailable`]), it could not be
    /// spawned, or it exceeded the timeout.
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;
}

/// Render a program and its arguments as a single command line for logs.
pub fn command_line(program: &str, args: &[&str]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

/// Runs real subprocesses.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl SystemRunner {
    /// Create a runner with an optional per-command timeout.
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    /// Create a runner from a timeout in seconds, where 0 disables it.
    pub fn with_timeout_secs(secs: u64) -> Self {
        Self::new((secs > 0).then(|| Duration::from_secs(secs)))
    }

    /// The configured per-command timeout.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        execute(program, args, self.timeout)
    }
}

/// Execute a program, capturing stdout and stderr.
pub fn execute(program: &str, args: &[&str], timeout: Option<Duration>) -> Result<CommandOutput> {
    let start = Instant::now();
    let line = command_line(program, args);
    tracing::debug!(command = %line, "spawning");

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DepkeepError::BackendUnavailable {
                    backend: program.to_string(),
                }
            } else {
                DepkeepError::CommandFailed {
                    command: line.clone(),
                    code: None,
                }
            }
        })?;

    // Drain both pipes on their own threads so a chatty child can't
    // block on a full pipe while we wait on it.
    let stdout_handle = drain(child.stdout.take());
    let stderr_handle = drain(child.stderr.take());

    let status = wait(&mut child, timeout, &line)?;
    let duration = start.elapsed();

    let stdout = stdout_handle.join().unwrap_or_default();
    let stderr = stderr_handle.join().unwrap_or_default();

    tracing::debug!(command = %line, code = ?status.code(), "finished");

    if status.success() {
        Ok(CommandOutput::success(stdout, stderr, duration))
    } else {
        Ok(CommandOutput::failure(status.code(), stdout, stderr, duration))
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn wait(child: &mut Child, timeout: Option<Duration>, line: &str) -> Result<ExitStatus> {
    let Some(limit) = timeout else {
        return Ok(child.wait()?);
    };

    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        if start.elapsed() >= limit {
            let _ = child.kill();
            let _ = child.wait();
            tracing::warn!(command = %line, "killed after {}s timeout", limit.as_secs());
            return Err(DepkeepError::CommandTimedOut {
                command: line.to_string(),
                seconds: limit.as_secs(),
            });
        }
        thread::sleep(POLL_INTERVAL);
    }
}
