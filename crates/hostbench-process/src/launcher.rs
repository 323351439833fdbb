//! Launch primitive contract.

use std::time::Duration;

use async_trait::async_trait;

use crate::command::{CommandLine, EnvVars};
use crate::error::{LaunchError, Result};

/// How a subject process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
    /// Exit code, absent when the process died from a signal.
    pub code: Option<i32>,
    /// Terminating signal (Unix).
    pub signal: Option<i32>,
    /// Wall time from spawn to exit.
    pub elapsed: Duration,
}

impl ExitOutcome {
    /// Outcome of a process that exited with `code`.
    #[must_use]
    pub const fn exited(code: i32, elapsed: Duration) -> Self {
        Self {
            code: Some(code),
            signal: None,
            elapsed,
        }
    }

    /// Returns true for a zero exit code.
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.code, Some(0))
    }

    /// Converts anything but a zero exit into a [`LaunchError`].
    ///
    /// # Errors
    /// Returns [`LaunchError::NonZeroExit`] or [`LaunchError::Signaled`].
    pub fn check(&self, command: &CommandLine) -> Result<()> {
        match (self.code, self.signal) {
            (Some(0), _) => Ok(()),
            (Some(exit_code), _) => Err(LaunchError::NonZeroExit {
                command_line: command.to_string(),
                exit_code,
            }),
            (None, Some(signal)) => Err(LaunchError::Signaled {
                command_line: command.to_string(),
                signal,
            }),
            (None, None) => Err(LaunchError::spawn(
                command.to_string(),
                "process ended without exit code or signal",
            )),
        }
    }
}

/// Starts a process and blocks until it exits.
///
/// Implementations overlay `env` on the caller's inherited environment; they
/// never clear it. A supervision timeout, if any, must surface as
/// [`LaunchError::Timeout`].
#[async_trait]
pub trait ProcessLauncher: Send + Sync {
    /// Runs `command` with `env` and waits for it to exit.
    ///
    /// # Errors
    /// Returns an error if the process cannot be started, waiting fails, or
    /// the supervision timeout expires. A non-zero exit is reported through
    /// [`ExitOutcome`], not as an error.
    async fn start_and_wait(&self, command: &CommandLine, env: &EnvVars) -> Result<ExitOutcome>;
}
