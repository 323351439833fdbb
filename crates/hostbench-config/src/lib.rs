// Allow unwrap/expect in tests for clear failure messages
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! # hostbench-config
//!
//! Configuration primitives shared by the hostbench test driver and the
//! subject processes it spawns.
//!
//! - [`OptionRegistry`]: the closed set of options the harness understands
//! - [`env_var_name_for_option`]: the option → environment variable contract
//! - [`SharedDataPerProcess`] / [`SharedDataPerRequest`]: JSON payloads that
//!   cross the process boundary
//! - [`HarnessConfig`]: typed values resolved from the environment or a file
//!
//! ## Example
//!
//! ```rust,ignore
//! use hostbench_config::{HarnessConfig, OptionRegistry};
//!
//! // Inside a spawned app code host
//! let registry = OptionRegistry::build()?;
//! let config = HarnessConfig::from_env(&registry)?;
//! let request = config.shared_data_per_request.expect("driver sets it");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod naming;
pub mod option;
pub mod payload;
pub mod registry;
pub mod types;

pub use config::HarnessConfig;
pub use error::{ConfigError, Result};
pub use naming::{
    ENV_VAR_NAME_PREFIX, ENV_VAR_NAMING_VERSION, env_var_name_for_option, is_valid_option_name,
    option_name_for_env_var,
};
pub use option::{OptionKind, OptionMetadata, OptionValue};
pub use payload::{MAX_ENV_VALUE_BYTES, PayloadKind, SharedDataPerProcess, SharedDataPerRequest};
pub use registry::{
    APP_CODE_HOST_KIND_OPTION_NAME, APP_CODE_HOST_TIMEOUT_OPTION_NAME,
    APP_CODE_PHP_EXE_OPTION_NAME, APP_CODE_PHP_INI_OPTION_NAME, LOG_LEVEL_OPTION_NAME,
    OptionRegistry, SHARED_DATA_PER_PROCESS_OPTION_NAME, SHARED_DATA_PER_REQUEST_OPTION_NAME,
};
pub use types::{AppCodeHostKind, LogLevel};
