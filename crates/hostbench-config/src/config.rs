//! Typed snapshot of every registered option.
//!
//! Values come from the environment (via the naming convention) and,
//! optionally, from a TOML file of raw option values. The environment always
//! wins over the file.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;

use crate::error::{ConfigError, Result};
use crate::naming::{env_var_name_for_option, option_name_for_env_var};
use crate::option::OptionValue;
use crate::payload::{SharedDataPerProcess, SharedDataPerRequest};
use crate::registry::{
    APP_CODE_HOST_KIND_OPTION_NAME, APP_CODE_HOST_TIMEOUT_OPTION_NAME,
    APP_CODE_PHP_EXE_OPTION_NAME, APP_CODE_PHP_INI_OPTION_NAME, DEFAULT_APP_CODE_HOST_TIMEOUT,
    LOG_LEVEL_OPTION_NAME, OptionRegistry, SHARED_DATA_PER_PROCESS_OPTION_NAME,
    SHARED_DATA_PER_REQUEST_OPTION_NAME,
};
use crate::types::{AppCodeHostKind, LogLevel};

/// Harness configuration resolved against an [`OptionRegistry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Kind of application host.
    pub app_code_host_kind: AppCodeHostKind,
    /// Interpreter executable; `php` from `PATH` when unset.
    pub app_code_php_exe: Option<String>,
    /// Interpreter ini file.
    pub app_code_php_ini: Option<String>,
    /// Harness log level.
    pub log_level: LogLevel,
    /// Upper bound on one subject process run.
    pub app_code_host_timeout: Duration,
    /// Per-process payload, present inside a subject process.
    pub shared_data_per_process: Option<SharedDataPerProcess>,
    /// Per-request payload, present inside a subject process.
    pub shared_data_per_request: Option<SharedDataPerRequest>,
    /// Values of registered options without a dedicated field.
    pub other: BTreeMap<&'static str, OptionValue>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            app_code_host_kind: AppCodeHostKind::NotSet,
            app_code_php_exe: None,
            app_code_php_ini: None,
            log_level: LogLevel::Trace,
            app_code_host_timeout: DEFAULT_APP_CODE_HOST_TIMEOUT,
            shared_data_per_process: None,
            shared_data_per_request: None,
            other: BTreeMap::new(),
        }
    }
}

impl HarnessConfig {
    /// Reads every registered option from the process environment.
    ///
    /// # Errors
    /// Returns an error if any present value is not UTF-8 or fails to parse.
    pub fn from_env(registry: &OptionRegistry) -> Result<Self> {
        Self::try_from_lookup(registry, |var| env_value(var, std::env::var_os(var)))
    }

    /// Reads every registered option through `lookup`, keyed by env-var name.
    ///
    /// # Errors
    /// Returns an error if any present value fails to parse.
    pub fn from_lookup<F>(registry: &OptionRegistry, mut lookup: F) -> Result<Self>
    where
        F: FnMut(&str) -> Option<String>,
    {
        Self::try_from_lookup(registry, |var| Ok(lookup(var)))
    }

    /// Like [`HarnessConfig::from_lookup`], for sources that can fail to
    /// produce a value.
    ///
    /// # Errors
    /// Returns the first lookup error, or an error if any present value
    /// fails to parse.
    pub fn try_from_lookup<F>(registry: &OptionRegistry, mut lookup: F) -> Result<Self>
    where
        F: FnMut(&str) -> Result<Option<String>>,
    {
        let mut config = Self::default();
        for meta in registry.iter() {
            let raw = lookup(&env_var_name_for_option(meta.name()))?;
            let value = meta.parse_or_default(raw.as_deref())?;
            config.apply(meta.name(), value)?;
        }
        Ok(config)
    }

    /// Loads raw option values from a TOML file, then applies environment overrides.
    ///
    /// Keys are option names. Values may be strings, integers or booleans.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, names an
    /// unknown option, or holds a malformed value.
    pub fn load(registry: &OptionRegistry, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let file_values = parse_toml_values(registry, &content).map_err(|e| match e {
            ConfigError::Configuration(msg) => {
                ConfigError::configuration(format!("{}: {msg}", path.display()))
            }
            other => other,
        })?;

        tracing::debug!(path = %path.display(), options = file_values.len(), "loaded harness config file");

        Self::try_from_lookup(registry, |var| {
            env_value(var, std::env::var_os(var))
                .map(|value| value.or_else(|| file_values.get(var).cloned()))
        })
    }

    fn apply(&mut self, name: &'static str, value: OptionValue) -> Result<()> {
        match (name, value) {
            (APP_CODE_HOST_KIND_OPTION_NAME, OptionValue::HostKind(kind)) => {
                self.app_code_host_kind = kind;
            }
            (APP_CODE_PHP_EXE_OPTION_NAME, value) => {
                self.app_code_php_exe = nullable_string(name, value)?;
            }
            (APP_CODE_PHP_INI_OPTION_NAME, value) => {
                self.app_code_php_ini = nullable_string(name, value)?;
            }
            (LOG_LEVEL_OPTION_NAME, OptionValue::LogLevel(level)) => self.log_level = level,
            (APP_CODE_HOST_TIMEOUT_OPTION_NAME, OptionValue::Duration(timeout)) => {
                self.app_code_host_timeout = timeout;
            }
            (SHARED_DATA_PER_PROCESS_OPTION_NAME, OptionValue::SharedDataPerProcess(data)) => {
                self.shared_data_per_process = Some(*data);
            }
            (SHARED_DATA_PER_REQUEST_OPTION_NAME, OptionValue::SharedDataPerRequest(data)) => {
                self.shared_data_per_request = Some(*data);
            }
            (
                SHARED_DATA_PER_PROCESS_OPTION_NAME | SHARED_DATA_PER_REQUEST_OPTION_NAME,
                OptionValue::Null,
            ) => {}
            (
                APP_CODE_HOST_KIND_OPTION_NAME
                | LOG_LEVEL_OPTION_NAME
                | APP_CODE_HOST_TIMEOUT_OPTION_NAME
                | SHARED_DATA_PER_PROCESS_OPTION_NAME
                | SHARED_DATA_PER_REQUEST_OPTION_NAME,
                value,
            ) => {
                return Err(ConfigError::configuration(format!(
                    "option `{name}` is registered with an unexpected kind (got {value:?})"
                )));
            }
            (name, value) => {
                self.other.insert(name, value);
            }
        }
        Ok(())
    }
}

/// Decodes one environment value; a present but non-UTF-8 value is an error.
fn env_value(var: &str, value: Option<OsString>) -> Result<Option<String>> {
    match value.map(OsString::into_string) {
        None => Ok(None),
        Some(Ok(text)) => Ok(Some(text)),
        Some(Err(raw)) => {
            let option = option_name_for_env_var(var).unwrap_or_else(|| var.to_string());
            Err(ConfigError::parse(
                &option,
                &raw.to_string_lossy(),
                format!("`{var}` is not valid UTF-8"),
            ))
        }
    }
}

fn nullable_string(name: &str, value: OptionValue) -> Result<Option<String>> {
    match value {
        OptionValue::Null => Ok(None),
        OptionValue::String(s) => Ok(Some(s)),
        other => Err(ConfigError::configuration(format!(
            "option `{name}` is registered with an unexpected kind (got {other:?})"
        ))),
    }
}

/// Parses a TOML document into raw values keyed by env-var name.
fn parse_toml_values(
    registry: &OptionRegistry,
    content: &str,
) -> Result<BTreeMap<String, String>> {
    let table: toml::Table = toml::from_str(content)
        .map_err(|e| ConfigError::configuration(format!("failed to parse config: {e}")))?;

    let mut values = BTreeMap::new();
    for (key, value) in table {
        let meta = registry.lookup(&key)?;
        let raw = match value {
            toml::Value::String(s) => s,
            toml::Value::Integer(n) => n.to_string(),
            toml::Value::Boolean(b) => b.to_string(),
            other => {
                return Err(ConfigError::configuration(format!(
                    "option `{key}` must be a string, integer or boolean, found {}",
                    other.type_str()
                )));
            }
        };
        values.insert(env_var_name_for_option(meta.name()), raw);
    }
    Ok(values)
}
