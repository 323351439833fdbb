//! How agent configuration reaches the subject process.
//!
//! The agent reads its own options either from `ELASTIC_APM_*` environment
//! variables or from `elastic_apm.*` ini directives. An [`AgentConfigSetter`]
//! picks one of those channels.

use std::collections::BTreeMap;
use std::fmt;

use hostbench_config::HarnessConfig;
use hostbench_process::{CommandLine, EnvVars};

/// Prefix of the agent's own environment variables.
pub const AGENT_ENV_VAR_PREFIX: &str = "ELASTIC_APM_";

/// Prefix of the agent's ini directives.
pub const AGENT_INI_PREFIX: &str = "elastic_apm.";

/// Interpreter used when `app_code_php_exe` is unset.
pub const DEFAULT_APP_CODE_PHP_EXE: &str = "php";

/// Supplies agent configuration to the subject process.
pub trait AgentConfigSetter: Send + Sync + fmt::Debug {
    /// Interpreter command line, without the entry-point script.
    fn app_code_cmd(&self, config: &HarnessConfig) -> CommandLine {
        base_app_code_cmd(config)
    }

    /// Variables added to the subject's environment, merged last.
    fn additional_env_vars(&self) -> EnvVars;
}

/// Interpreter from `app_code_php_exe`, plus `-c <ini>` when `app_code_php_ini` is set.
#[must_use]
pub fn base_app_code_cmd(config: &HarnessConfig) -> CommandLine {
    let exe = config
        .app_code_php_exe
        .as_deref()
        .unwrap_or(DEFAULT_APP_CODE_PHP_EXE);
    let cmd = CommandLine::new(exe);
    match config.app_code_php_ini.as_deref() {
        Some(ini) => cmd.arg("-c").arg(ini),
        None => cmd,
    }
}

/// Passes agent options as `ELASTIC_APM_<OPTION>` environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvVarsAgentConfigSetter {
    options: BTreeMap<String, String>,
}

impl EnvVarsAgentConfigSetter {
    /// Creates a setter with no options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an agent option, e.g. `("service_name", "checkout")`.
    #[must_use]
    pub fn set(mut self, option: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(option.into(), value.into());
        self
    }
}

impl AgentConfigSetter for EnvVarsAgentConfigSetter {
    fn additional_env_vars(&self) -> EnvVars {
        self.options
            .iter()
            .map(|(option, value)| {
                (
                    format!("{AGENT_ENV_VAR_PREFIX}{}", option.to_ascii_uppercase()),
                    value.clone(),
                )
            })
            .collect()
    }
}

/// Passes agent options as `-d elastic_apm.<option>=<value>` interpreter flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniAgentConfigSetter {
    options: BTreeMap<String, String>,
}

impl IniAgentConfigSetter {
    /// Creates a setter with no options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an agent option.
    #[must_use]
    pub fn set(mut self, option: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(option.into(), value.into());
        self
    }
}

impl AgentConfigSetter for IniAgentConfigSetter {
    fn app_code_cmd(&self, config: &HarnessConfig) -> CommandLine {
        self.options
            .iter()
            .fold(base_app_code_cmd(config), |cmd, (option, value)| {
                cmd.arg("-d")
                    .arg(format!("{AGENT_INI_PREFIX}{option}={value}"))
            })
    }

    fn additional_env_vars(&self) -> EnvVars {
        EnvVars::new()
    }
}
