//! Harness error types.

use std::fmt;

use hostbench_config::ConfigError;
use hostbench_process::LaunchError;
use uuid::Uuid;

/// Result type alias for harness operations.
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Step of a test run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RunStep {
    /// Building the shared data payloads.
    BuildingPayload,
    /// Converting payloads to JSON text.
    Serializing,
    /// Composing command line and environment.
    Launching,
    /// Waiting for the subject process to exit.
    Waiting,
    /// Fetching and checking telemetry.
    Verifying,
}

impl fmt::Display for RunStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BuildingPayload => "building payload",
            Self::Serializing => "serializing",
            Self::Launching => "launching",
            Self::Waiting => "waiting",
            Self::Verifying => "verifying",
        })
    }
}

/// Recorded transaction field checked by verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionField {
    /// Transaction name.
    Name,
    /// Transaction type.
    Type,
}

impl fmt::Display for TransactionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Name => "name",
            Self::Type => "type",
        })
    }
}

/// One expected/actual disagreement on the root transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// Field that disagreed.
    pub field: TransactionField,
    /// Expected value.
    pub expected: String,
    /// Recorded value.
    pub actual: String,
    /// True when `expected` came from the environment's default.
    pub from_default: bool,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "root transaction {}: expected {:?}{}, actual {:?}",
            self.field,
            self.expected,
            if self.from_default { " (default)" } else { "" },
            self.actual
        )
    }
}

/// Harness errors.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// Option registry, option parsing or payload decoding failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A payload could not be converted to JSON or does not fit its channel.
    #[error("failed to serialize `{option}`: {reason}")]
    Serialization {
        /// Option carrying the payload.
        option: String,
        /// Why serialization failed.
        reason: String,
    },

    /// The subject process could not be started or did not exit cleanly.
    #[error("process launch error: {0}")]
    ProcessLaunch(#[from] LaunchError),

    /// Telemetry could not be fetched or is not shaped as expected.
    #[error("telemetry error: {0}")]
    Telemetry(String),

    /// Recorded telemetry does not match the test's expectations.
    #[error("verification failed: {}", join_mismatches(.mismatches))]
    Verification {
        /// Every field that disagreed.
        mismatches: Vec<Mismatch>,
    },
}

fn join_mismatches(mismatches: &[Mismatch]) -> String {
    mismatches
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl HarnessError {
    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(option: &str, reason: impl Into<String>) -> Self {
        Self::Serialization {
            option: option.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates a telemetry error.
    #[must_use]
    pub fn telemetry(msg: impl Into<String>) -> Self {
        Self::Telemetry(msg.into())
    }

    /// Returns true if this is a test assertion failure rather than a crash.
    #[must_use]
    pub const fn is_assertion_failure(&self) -> bool {
        matches!(self, Self::Verification { .. })
    }
}

/// A failed test run.
#[derive(Debug, thiserror::Error)]
#[error("run {run_id} failed while {step}: {source}")]
pub struct RunError {
    /// Run identifier.
    pub run_id: Uuid,
    /// Step that failed.
    pub step: RunStep,
    /// Underlying failure.
    pub source: HarnessError,
}

impl RunError {
    /// Returns true if the run failed verification rather than crashing.
    #[must_use]
    pub const fn is_assertion_failure(&self) -> bool {
        self.source.is_assertion_failure()
    }
}
