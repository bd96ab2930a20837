//! Host command execution with a timeout.

use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::debug;

use super::CollectError;

/// Command execution options.
#[derive(Debug, Clone)]
pub struct ExecOptions {
    /// Maximum command runtime before the child is killed.
    pub timeout: Duration,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
        }
    }
}

/// Command execution result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    /// Process exit code (`None` when the process was killed or exit code unavailable).
    pub exit_code: Option<i32>,
    /// Captured stdout text.
    pub stdout: String,
    /// Captured stderr text.
    pub stderr: String,
    /// Whether the command exceeded the timeout.
    pub timed_out: bool,
    /// Wall-clock duration of the execution.
    pub duration: Duration,
}

impl ExecResult {
    /// Returns `true` when the command exited successfully (code 0, no timeout).
    pub fn success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }
}

/// Runs a host program and captures its output.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` and capture output.
    ///
    /// A timeout is reported through [`ExecResult::timed_out`], not as an error.
    async fn run(
        &self,
        program: &str,
        args: &[String],
        opts: &ExecOptions,
    ) -> Result<ExecResult, CollectError>;
}

/// [`CommandRunner`] backed by `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        opts: &ExecOptions,
    ) -> Result<ExecResult, CollectError> {
        let started = Instant::now();
        let child = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| CollectError::Spawn {
                program: program.to_owned(),
                source,
            })?;

        match tokio::time::timeout(opts.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => Ok(ExecResult {
                exit_code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                timed_out: false,
                duration: started.elapsed(),
            }),
            Ok(Err(source)) => Err(CollectError::Spawn {
                program: program.to_owned(),
                source,
            }),
            Err(_) => {
                debug!(program, timeout_secs = opts.timeout.as_secs(), "command timed out");
                Ok(ExecResult {
                    exit_code: None,
                    stdout: String::new(),
                    stderr: String::new(),
                    timed_out: true,
                    duration: started.elapsed(),
                })
            }
        }
    }
}
