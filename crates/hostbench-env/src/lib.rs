// Allow unwrap/expect in tests for clear failure messages
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! # hostbench-env
//!
//! Test-environment orchestration for end-to-end agent tests.
//!
//! A test supplies [`TestProperties`]. The [`Orchestrator`] builds the shared
//! data payloads, serializes them, hands them to a [`TestEnvironment`] that
//! runs the subject process, then verifies the root transaction the agent
//! recorded.
//!
//! - [`CliScriptTestEnv`]: runs app code as a CLI script, payloads in env vars
//! - [`AgentConfigSetter`]: env-var or ini channel for agent options
//! - [`TelemetrySource`]: where the recorded transactions come from
//!
//! ## Example
//!
//! ```rust,ignore
//! use hostbench_env::{CliScriptTestEnv, IntakeFileTelemetry, Orchestrator, TestProperties};
//!
//! let env = CliScriptTestEnv::native(config.clone(), scripts_dir);
//! let telemetry = Arc::new(IntakeFileTelemetry::new("/tmp/intake.ndjson"));
//! let mut orchestrator = Orchestrator::new(config, telemetry);
//!
//! let props = TestProperties::for_app_code("AppCode", "run");
//! let report = orchestrator.run(&env, &props).await?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod agent_config;
pub mod cli;
pub mod environment;
pub mod error;
pub mod orchestrator;
pub mod properties;
pub mod telemetry;
#[cfg(test)]
pub mod tests;

pub use agent_config::{AgentConfigSetter, EnvVarsAgentConfigSetter, IniAgentConfigSetter};
pub use cli::{
    CliScriptTestEnv, SCRIPT_TO_RUN_APP_CODE_HOST, TRANSACTION_TYPE_CLI, select_environment,
};
pub use environment::{SerializedPayloads, TestEnvironment, verify_root_transaction};
pub use error::{HarnessError, Mismatch, Result, RunError, RunStep, TransactionField};
pub use orchestrator::{Orchestrator, RunReport};
pub use properties::TestProperties;
pub use telemetry::{InMemoryTelemetry, IntakeFileTelemetry, TelemetrySource, TransactionData};
