//! Shared data payloads carried from the test driver to the subject process.
//!
//! Both payloads travel as JSON text inside a single environment variable.
//! Linux caps one `NAME=value` environment string at `MAX_ARG_STRLEN`
//! (128 KiB, NUL included), so a serialized payload must stay below
//! [`MAX_ENV_VALUE_BYTES`] minus its variable name. `serde_json` escapes
//! control characters, so payload text never contains a NUL byte.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{ConfigError, Result};
use crate::option::OptionValue;
use crate::registry::{SHARED_DATA_PER_PROCESS_OPTION_NAME, SHARED_DATA_PER_REQUEST_OPTION_NAME};
use crate::types::AppCodeHostKind;

/// Upper bound for one `NAME=value` environment string, terminator included.
pub const MAX_ENV_VALUE_BYTES: usize = 128 * 1024;

/// Facts shared with the whole subject process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SharedDataPerProcess {
    run_id: Uuid,
    root_process_id: u32,
    app_code_host_kind: AppCodeHostKind,
    /// Free-form harness metadata.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    extensions: BTreeMap<String, Value>,
}

impl SharedDataPerProcess {
    /// Creates a payload for one spawned process.
    #[must_use]
    pub fn new(run_id: Uuid, root_process_id: u32, app_code_host_kind: AppCodeHostKind) -> Self {
        Self {
            run_id,
            root_process_id,
            app_code_host_kind,
            extensions: BTreeMap::new(),
        }
    }

    /// Adds a free-form metadata entry.
    #[must_use]
    pub fn with_extension(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extensions.insert(key.into(), value);
        self
    }

    /// Identifier correlating the spawned process with the test run.
    #[must_use]
    pub const fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// PID of the test driver that spawned the process.
    #[must_use]
    pub const fn root_process_id(&self) -> u32 {
        self.root_process_id
    }

    /// Host kind the process was launched as.
    #[must_use]
    pub const fn app_code_host_kind(&self) -> AppCodeHostKind {
        self.app_code_host_kind
    }

    /// Free-form metadata entries.
    #[must_use]
    pub const fn extensions(&self) -> &BTreeMap<String, Value> {
        &self.extensions
    }

    /// Serializes to JSON text.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Decodes from JSON text.
    pub fn from_json(raw: &str) -> Result<Self> {
        decode_json_object(SHARED_DATA_PER_PROCESS_OPTION_NAME, raw)
    }
}

/// Facts shared with a single request handled by the subject process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SharedDataPerRequest {
    app_code_class: String,
    app_code_method: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    app_code_args: BTreeMap<String, Value>,
    #[serde(default)]
    is_app_code_expected_to_throw: bool,
}

impl SharedDataPerRequest {
    /// Creates a payload targeting one app code method.
    #[must_use]
    pub fn new(app_code_class: impl Into<String>, app_code_method: impl Into<String>) -> Self {
        Self {
            app_code_class: app_code_class.into(),
            app_code_method: app_code_method.into(),
            app_code_args: BTreeMap::new(),
            is_app_code_expected_to_throw: false,
        }
    }

    /// Adds an argument passed to the app code.
    #[must_use]
    pub fn with_arg(mut self, key: impl Into<String>, value: Value) -> Self {
        self.app_code_args.insert(key.into(), value);
        self
    }

    /// Marks the app code as expected to throw.
    #[must_use]
    pub const fn expecting_throw(mut self) -> Self {
        self.is_app_code_expected_to_throw = true;
        self
    }

    /// Class containing the app code.
    #[must_use]
    pub fn app_code_class(&self) -> &str {
        &self.app_code_class
    }

    /// Method the host invokes.
    #[must_use]
    pub fn app_code_method(&self) -> &str {
        &self.app_code_method
    }

    /// Arguments passed to the app code.
    #[must_use]
    pub const fn app_code_args(&self) -> &BTreeMap<String, Value> {
        &self.app_code_args
    }

    /// Whether the app code is expected to throw.
    #[must_use]
    pub const fn is_app_code_expected_to_throw(&self) -> bool {
        self.is_app_code_expected_to_throw
    }

    /// Serializes to JSON text.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Decodes from JSON text.
    pub fn from_json(raw: &str) -> Result<Self> {
        decode_json_object(SHARED_DATA_PER_REQUEST_OPTION_NAME, raw)
    }
}

/// Type tag of a structured payload option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    /// [`SharedDataPerProcess`].
    SharedDataPerProcess,
    /// [`SharedDataPerRequest`].
    SharedDataPerRequest,
}

impl PayloadKind {
    /// Decodes raw JSON text into the payload this tag names.
    ///
    /// # Errors
    /// Returns [`ConfigError::Deserialization`] naming `option` on malformed
    /// JSON, a non-object document, a missing field or a wrong field type.
    pub fn decode(self, option: &str, raw: &str) -> Result<OptionValue> {
        match self {
            Self::SharedDataPerProcess => decode_json_object(option, raw)
                .map(|data| OptionValue::SharedDataPerProcess(Box::new(data))),
            Self::SharedDataPerRequest => decode_json_object(option, raw)
                .map(|data| OptionValue::SharedDataPerRequest(Box::new(data))),
        }
    }
}

/// Decodes JSON text to a generic value, requires an object, then builds `T`.
fn decode_json_object<T: DeserializeOwned>(option: &str, raw: &str) -> Result<T> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| ConfigError::deserialization(option, raw, e.to_string()))?;

    let Value::Object(map) = value else {
        return Err(ConfigError::deserialization(
            option,
            raw,
            format!("expected a JSON object, found {}", json_kind(&value)),
        ));
    };

    serde_json::from_value(Value::Object(map))
        .map_err(|e| ConfigError::deserialization(option, raw, e.to_string()))
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
