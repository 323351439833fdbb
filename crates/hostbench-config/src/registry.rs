//! Option metadata registry.
//!
//! The registry is the closed set of options the harness reads and writes.
//! Environment-variable names are derived from option names alone, so the
//! registry and the orchestrator only share [`env_var_name_for_option`].

use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::{ConfigError, Result};
use crate::naming::{env_var_name_for_option, is_valid_option_name};
use crate::option::{OptionKind, OptionMetadata, OptionValue};
use crate::payload::PayloadKind;
use crate::types::{AppCodeHostKind, LogLevel};

/// Kind of application host the subject process runs as.
pub const APP_CODE_HOST_KIND_OPTION_NAME: &str = "app_code_host_kind";
/// Interpreter executable used to run app code.
pub const APP_CODE_PHP_EXE_OPTION_NAME: &str = "app_code_php_exe";
/// Interpreter ini file used to run app code.
pub const APP_CODE_PHP_INI_OPTION_NAME: &str = "app_code_php_ini";
/// Harness log level.
pub const LOG_LEVEL_OPTION_NAME: &str = "log_level";
/// Upper bound on how long the subject process may run.
pub const APP_CODE_HOST_TIMEOUT_OPTION_NAME: &str = "app_code_host_timeout";
/// JSON payload shared with the whole subject process.
pub const SHARED_DATA_PER_PROCESS_OPTION_NAME: &str = "shared_data_per_process";
/// JSON payload shared with one request.
pub const SHARED_DATA_PER_REQUEST_OPTION_NAME: &str = "shared_data_per_request";

/// Default for [`APP_CODE_HOST_TIMEOUT_OPTION_NAME`].
pub const DEFAULT_APP_CODE_HOST_TIMEOUT: Duration = Duration::from_secs(60);

/// Immutable mapping from option name to metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionRegistry {
    options: BTreeMap<&'static str, OptionMetadata>,
}

impl OptionRegistry {
    /// Builds the registry of every option the harness understands.
    ///
    /// # Errors
    /// Returns [`ConfigError::Configuration`] if the built-in table is
    /// inconsistent.
    pub fn build() -> Result<Self> {
        Self::from_entries(builtin_options())
    }

    /// Builds a registry from explicit entries.
    ///
    /// # Errors
    /// Returns [`ConfigError::Configuration`] on a duplicate name or a name
    /// the naming convention cannot map injectively.
    pub fn from_entries(entries: impl IntoIterator<Item = OptionMetadata>) -> Result<Self> {
        let mut options = BTreeMap::new();
        for meta in entries {
            let name = meta.name();
            if !is_valid_option_name(name) {
                return Err(ConfigError::configuration(format!(
                    "invalid option name `{name}`"
                )));
            }
            if options.insert(name, meta).is_some() {
                return Err(ConfigError::configuration(format!(
                    "duplicate option `{name}`"
                )));
            }
        }
        tracing::trace!(count = options.len(), "built option registry");
        Ok(Self { options })
    }

    /// Returns the metadata for `name`, if registered.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&OptionMetadata> {
        self.options.get(name)
    }

    /// Returns the metadata for `name`.
    ///
    /// # Errors
    /// Returns [`ConfigError::Configuration`] for an unknown option.
    pub fn lookup(&self, name: &str) -> Result<&OptionMetadata> {
        self.get(name)
            .ok_or_else(|| ConfigError::configuration(format!("unknown option `{name}`")))
    }

    /// Returns the environment variable carrying a registered option.
    ///
    /// # Errors
    /// Returns [`ConfigError::Configuration`] for an unknown option.
    pub fn env_var_name(&self, name: &str) -> Result<String> {
        self.lookup(name).map(|meta| env_var_name_for_option(meta.name()))
    }

    /// Parses raw text for a registered option.
    ///
    /// # Errors
    /// Fails for unknown options and malformed values.
    pub fn parse(&self, name: &str, raw: &str) -> Result<OptionValue> {
        self.lookup(name)?.parse(raw)
    }

    /// Registered option names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.options.keys().copied()
    }

    /// Registered descriptors in name order.
    pub fn iter(&self) -> impl Iterator<Item = &OptionMetadata> {
        self.options.values()
    }

    /// Number of registered options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

fn builtin_options() -> Vec<OptionMetadata> {
    vec![
        OptionMetadata::new(
            APP_CODE_HOST_KIND_OPTION_NAME,
            OptionKind::HostKind {
                default: AppCodeHostKind::NotSet,
            },
        ),
        OptionMetadata::new(APP_CODE_PHP_EXE_OPTION_NAME, OptionKind::NullableString),
        OptionMetadata::new(APP_CODE_PHP_INI_OPTION_NAME, OptionKind::NullableString),
        OptionMetadata::new(
            LOG_LEVEL_OPTION_NAME,
            OptionKind::LogLevel {
                default: LogLevel::Trace,
            },
        ),
        OptionMetadata::new(
            APP_CODE_HOST_TIMEOUT_OPTION_NAME,
            OptionKind::Duration {
                default: DEFAULT_APP_CODE_HOST_TIMEOUT,
            },
        ),
        OptionMetadata::new(
            SHARED_DATA_PER_PROCESS_OPTION_NAME,
            OptionKind::Custom(PayloadKind::SharedDataPerProcess),
        ),
        OptionMetadata::new(
            SHARED_DATA_PER_REQUEST_OPTION_NAME,
            OptionKind::Custom(PayloadKind::SharedDataPerRequest),
        ),
    ]
}
