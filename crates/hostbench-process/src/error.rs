//! Launch error types.

use std::time::Duration;

/// Result type alias for launch operations.
pub type Result<T> = std::result::Result<T, LaunchError>;

/// Failures starting or waiting for a subject process.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    /// The process could not be started.
    #[error("failed to start `{command_line}`: {reason}")]
    Spawn {
        /// Rendered command line.
        command_line: String,
        /// Why spawning failed.
        reason: String,
    },

    /// The process exited with a non-zero code.
    #[error("`{command_line}` exited with code {exit_code}")]
    NonZeroExit {
        /// Rendered command line.
        command_line: String,
        /// Exit code.
        exit_code: i32,
    },

    /// The process was terminated by a signal.
    #[error("`{command_line}` was terminated by signal {signal}")]
    Signaled {
        /// Rendered command line.
        command_line: String,
        /// Signal number.
        signal: i32,
    },

    /// The process outlived its time budget and was killed.
    #[error("`{command_line}` did not exit within {}", humantime::format_duration(*timeout))]
    Timeout {
        /// Rendered command line.
        command_line: String,
        /// Budget that expired.
        timeout: Duration,
    },

    /// Waiting for the process failed.
    #[error("failed to wait for `{command_line}`: {source}")]
    Wait {
        /// Rendered command line.
        command_line: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl LaunchError {
    /// Creates a spawn error.
    #[must_use]
    pub fn spawn(command_line: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Spawn {
            command_line: command_line.into(),
            reason: reason.into(),
        }
    }

    /// Exit code, when the process ran to completion.
    #[must_use]
    pub const fn exit_code(&self) -> Option<i32> {
        match self {
            Self::NonZeroExit { exit_code, .. } => Some(*exit_code),
            _ => None,
        }
    }

    /// Creates a wait error.
    #[must_use]
    pub fn wait(command_line: impl Into<String>, source: std::io::Error) -> Self {
        Self::Wait {
            command_line: command_line.into(),
            source,
        }
    }

    /// Rendered command line.
    #[must_use]
    pub fn command_line(&self) -> &str {
        match self {
            Self::Spawn { command_line, .. }
            | Self::NonZeroExit { command_line, .. }
            | Self::Signaled { command_line, .. }
            | Self::Timeout { command_line, .. }
            | Self::Wait { command_line, .. } => command_line,
        }
    }
}
