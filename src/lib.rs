// Allow unwrap/expect in tests for clear failure messages
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! hostbench: end-to-end test harness for instrumentation agents.
//!
//! The harness runs application code in a separate host process, hands it
//! the test's shared data through environment variables and checks the root
//! transaction the agent recorded.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use hostbench::prelude::*;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = OptionRegistry::build()?;
//! let config = HarnessConfig::from_env(&registry)?;
//! hostbench::init_logging(&config)?;
//!
//! let env = CliScriptTestEnv::native(config.clone(), "tests/app_code");
//! let telemetry = Arc::new(IntakeFileTelemetry::new("/tmp/intake.ndjson"));
//! let mut orchestrator = Orchestrator::new(config, telemetry);
//!
//! let props = TestProperties::for_app_code("AppCode", "spanCreation");
//! orchestrator.run(&env, &props).await?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub use hostbench_config as config;
pub use hostbench_env as env;
pub use hostbench_process as process;

use hostbench_config::HarnessConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::TryInitError;

/// Prelude module for common imports.
pub mod prelude {
    pub use hostbench_config::{
        AppCodeHostKind, HarnessConfig, LogLevel, OptionRegistry, SharedDataPerProcess,
        SharedDataPerRequest,
    };
    pub use hostbench_env::{
        AgentConfigSetter, CliScriptTestEnv, EnvVarsAgentConfigSetter, HarnessError,
        IniAgentConfigSetter, IntakeFileTelemetry, Orchestrator, RunError, TelemetrySource,
        TestEnvironment, TestProperties, select_environment,
    };
    pub use hostbench_process::{NativeLauncher, ProcessLauncher};
}

/// Builds the log filter for `config`.
///
/// `RUST_LOG` takes precedence over the `log_level` option.
#[must_use]
pub fn log_filter(config: &HarnessConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_filter_directive()))
}

/// Installs a global fmt subscriber filtered per [`log_filter`].
///
/// # Errors
/// Fails if a global subscriber is already installed.
pub fn init_logging(config: &HarnessConfig) -> Result<(), TryInitError> {
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(config))
        .with_target(false)
        .finish()
        .try_init()
}
