//! CLI script test environment.
//!
//! Runs the app code host as a CLI script. Payloads travel in environment
//! variables named by the option naming convention.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use hostbench_config::{
    APP_CODE_HOST_KIND_OPTION_NAME, AppCodeHostKind, ConfigError, HarnessConfig,
    LOG_LEVEL_OPTION_NAME, MAX_ENV_VALUE_BYTES, SHARED_DATA_PER_PROCESS_OPTION_NAME,
    SHARED_DATA_PER_REQUEST_OPTION_NAME, env_var_name_for_option,
};
use hostbench_process::{CommandLine, EnvVars, NativeLauncher, ProcessLauncher};

use crate::environment::{SerializedPayloads, TestEnvironment};
use crate::error::{HarnessError, Result};
use crate::properties::TestProperties;

/// Entry-point script that hosts app code in a CLI process.
pub const SCRIPT_TO_RUN_APP_CODE_HOST: &str = "runCliScriptAppCodeHost.php";

/// Transaction type the agent assigns to CLI scripts.
pub const TRANSACTION_TYPE_CLI: &str = "cli";

/// Test environment running app code through the CLI interpreter.
pub struct CliScriptTestEnv {
    config: HarnessConfig,
    scripts_dir: PathBuf,
    launcher: Arc<dyn ProcessLauncher>,
}

impl CliScriptTestEnv {
    /// Creates an environment using `launcher` to run the subject.
    ///
    /// `scripts_dir` holds [`SCRIPT_TO_RUN_APP_CODE_HOST`].
    #[must_use]
    pub fn new(
        config: HarnessConfig,
        scripts_dir: impl Into<PathBuf>,
        launcher: Arc<dyn ProcessLauncher>,
    ) -> Self {
        Self {
            config,
            scripts_dir: scripts_dir.into(),
            launcher,
        }
    }

    /// Creates an environment with a [`NativeLauncher`] bounded by
    /// `app_code_host_timeout`.
    #[must_use]
    pub fn native(config: HarnessConfig, scripts_dir: impl Into<PathBuf>) -> Self {
        let launcher = NativeLauncher::new().with_timeout(config.app_code_host_timeout);
        Self::new(config, scripts_dir, Arc::new(launcher))
    }

    /// Full path of the entry-point script.
    #[must_use]
    pub fn script_path(&self) -> PathBuf {
        self.scripts_dir.join(SCRIPT_TO_RUN_APP_CODE_HOST)
    }

    /// Directory holding the entry-point script.
    #[must_use]
    pub fn scripts_dir(&self) -> &Path {
        &self.scripts_dir
    }

    /// Interpreter command plus the entry-point script.
    #[must_use]
    pub fn build_command_line(&self, properties: &TestProperties) -> CommandLine {
        properties
            .agent_config_setter()
            .app_code_cmd(&self.config)
            .arg(self.script_path().display().to_string())
    }

    /// Environment overlay for the subject process.
    ///
    /// Forwarded harness options, then both payloads, then the agent config
    /// setter's variables.
    ///
    /// # Errors
    /// Fails if a payload exceeds the environment size limit or the setter
    /// tries to replace a payload variable.
    pub fn build_env_vars(
        &self,
        properties: &TestProperties,
        payloads: &SerializedPayloads,
    ) -> Result<EnvVars> {
        let host_kind = payloads.app_code_host_kind();
        if host_kind != AppCodeHostKind::CliScript {
            return Err(ConfigError::configuration(format!(
                "CLI script environment cannot run app code host kind `{host_kind}`"
            ))
            .into());
        }

        let mut env = EnvVars::new();
        env.insert(
            env_var_name_for_option(LOG_LEVEL_OPTION_NAME),
            self.config.log_level.as_str(),
        );
        env.insert(
            env_var_name_for_option(APP_CODE_HOST_KIND_OPTION_NAME),
            host_kind.as_str(),
        );

        let payload_vars = [
            (SHARED_DATA_PER_PROCESS_OPTION_NAME, payloads.per_process()),
            (SHARED_DATA_PER_REQUEST_OPTION_NAME, payloads.per_request()),
        ]
        .map(|(option, json)| (option, env_var_name_for_option(option), json));

        for (option, name, json) in &payload_vars {
            // NAME=value plus the terminating NUL
            let size = name.len() + 1 + json.len() + 1;
            if size > MAX_ENV_VALUE_BYTES {
                return Err(HarnessError::serialization(
                    option,
                    format!(
                        "payload is {size} bytes as an environment string, limit is {MAX_ENV_VALUE_BYTES}"
                    ),
                ));
            }
            env.insert(name.as_str(), *json);
        }

        for (name, value) in properties.agent_config_setter().additional_env_vars() {
            if payload_vars.iter().any(|(_, payload_var, _)| *payload_var == name) {
                return Err(ConfigError::configuration(format!(
                    "agent config setter may not override payload variable `{name}`"
                ))
                .into());
            }
            if let Some(previous) = env.insert(name.as_str(), value.as_str()) {
                tracing::debug!(var = %name, previous = %previous, "agent config setter overrides forwarded variable");
            }
        }

        Ok(env)
    }
}

#[async_trait]
impl TestEnvironment for CliScriptTestEnv {
    async fn deliver_and_run(
        &self,
        properties: &TestProperties,
        payloads: &SerializedPayloads,
    ) -> Result<()> {
        let env = self.build_env_vars(properties, payloads)?;
        let command = self.build_command_line(properties);

        tracing::debug!(
            run_id = %payloads.run_id(),
            command_line = %command,
            app_code_class = properties.shared_data_per_request().app_code_class(),
            app_code_method = properties.shared_data_per_request().app_code_method(),
            "running CLI app code host"
        );

        let outcome = self.launcher.start_and_wait(&command, &env).await?;
        outcome.check(&command)?;
        Ok(())
    }

    fn default_transaction_name(&self) -> &str {
        SCRIPT_TO_RUN_APP_CODE_HOST
    }

    fn default_transaction_type(&self) -> &str {
        TRANSACTION_TYPE_CLI
    }
}

/// Picks the test environment for the configured host kind.
///
/// An unset host kind runs as a CLI script.
///
/// # Errors
/// Returns [`HarnessError::Config`] for host kinds without an available
/// environment.
pub fn select_environment(
    config: &HarnessConfig,
    scripts_dir: impl Into<PathBuf>,
    launcher: Arc<dyn ProcessLauncher>,
) -> Result<Box<dyn TestEnvironment>> {
    match config.app_code_host_kind.resolved() {
        AppCodeHostKind::CliScript => Ok(Box::new(
            CliScriptTestEnv::new(config.clone(), scripts_dir, launcher),
        )),
        kind => Err(ConfigError::configuration(format!(
            "no test environment available for app code host kind `{kind}`"
        ))
        .into()),
    }
}
