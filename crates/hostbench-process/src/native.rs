//! Native launcher using `tokio::process`.

use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::Command;

use crate::command::{CommandLine, EnvVars};
use crate::error::{LaunchError, Result};
use crate::launcher::{ExitOutcome, ProcessLauncher};

/// Spawns the subject as a regular OS process.
///
/// stdout and stderr are inherited so the subject's output lands in the test
/// log; stdin is closed.
#[derive(Debug, Clone, Default)]
pub struct NativeLauncher {
    timeout: Option<Duration>,
    working_dir: Option<PathBuf>,
}

impl NativeLauncher {
    /// Creates a launcher without a timeout.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: None,
            working_dir: None,
        }
    }

    /// Kills the subject and fails if it runs longer than `timeout`.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Runs the subject from `dir`.
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Configured timeout.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

#[async_trait]
impl ProcessLauncher for NativeLauncher {
    async fn start_and_wait(&self, command: &CommandLine, env: &EnvVars) -> Result<ExitOutcome> {
        let mut cmd = Command::new(command.program());
        cmd.args(command.arguments())
            .envs(env.iter())
            .stdin(Stdio::null())
            .kill_on_drop(true);

        if let Some(ref cwd) = self.working_dir {
            cmd.current_dir(cwd);
        }

        let start = Instant::now();
        let mut child = cmd
            .spawn()
            .map_err(|e| LaunchError::spawn(command.to_string(), e.to_string()))?;

        tracing::info!(pid = ?child.id(), command_line = %command, env_vars = env.len(), "started subject process");

        let waited = |e: std::io::Error| LaunchError::wait(command.to_string(), e);
        let status = match self.timeout {
            None => child.wait().await.map_err(waited)?,
            Some(timeout) => match tokio::time::timeout(timeout, child.wait()).await {
                Ok(status) => status.map_err(waited)?,
                Err(_) => {
                    tracing::warn!(command_line = %command, timeout = ?timeout, "subject process timed out, killing");
                    if let Err(e) = child.kill().await {
                        tracing::debug!(error = %e, "kill failed, process may have exited");
                    }
                    return Err(LaunchError::Timeout {
                        command_line: command.to_string(),
                        timeout,
                    });
                }
            },
        };

        let outcome = outcome_from_status(status, start.elapsed());
        tracing::info!(
            exit_code = ?outcome.code,
            signal = ?outcome.signal,
            elapsed = ?outcome.elapsed,
            "subject process exited"
        );
        Ok(outcome)
    }
}

fn outcome_from_status(status: ExitStatus, elapsed: Duration) -> ExitOutcome {
    #[cfg(unix)]
    let signal = {
        use std::os::unix::process::ExitStatusExt;
        status.signal()
    };
    #[cfg(not(unix))]
    let signal = None;

    ExitOutcome {
        code: status.code(),
        signal,
        elapsed,
    }
}
