//! Typed option descriptors.
//!
//! An [`OptionMetadata`] pairs a name with an [`OptionKind`]. The kind decides
//! how raw text becomes an [`OptionValue`] and what the default is. Structured
//! payload options are tagged with a [`PayloadKind`] and decoded through
//! [`PayloadKind::decode`].

use std::time::Duration;

use crate::error::{ConfigError, Result};
use crate::payload::{PayloadKind, SharedDataPerProcess, SharedDataPerRequest};
use crate::types::{AppCodeHostKind, LogLevel};

/// How an option's raw text is parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionKind {
    /// Free text; absent means null.
    NullableString,
    /// Application host kind.
    HostKind {
        /// Value when absent.
        default: AppCodeHostKind,
    },
    /// Harness log level.
    LogLevel {
        /// Value when absent.
        default: LogLevel,
    },
    /// `true`/`false`, `yes`/`no`, `on`/`off`, `1`/`0`.
    Bool {
        /// Value when absent.
        default: bool,
    },
    /// Signed integer.
    Int {
        /// Value when absent.
        default: i64,
    },
    /// Human-readable duration such as `30s` or `1m 30s`.
    Duration {
        /// Value when absent.
        default: Duration,
    },
    /// Structured payload decoded from JSON; absent means null.
    Custom(PayloadKind),
}

/// Parsed option value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// No value.
    Null,
    /// Text.
    String(String),
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Log level.
    LogLevel(LogLevel),
    /// Host kind.
    HostKind(AppCodeHostKind),
    /// Duration.
    Duration(Duration),
    /// Per-process shared data.
    SharedDataPerProcess(Box<SharedDataPerProcess>),
    /// Per-request shared data.
    SharedDataPerRequest(Box<SharedDataPerRequest>),
}

impl OptionValue {
    /// Returns true for [`OptionValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Descriptor for one named configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionMetadata {
    name: &'static str,
    kind: OptionKind,
}

impl OptionMetadata {
    /// Creates a descriptor.
    #[must_use]
    pub const fn new(name: &'static str, kind: OptionKind) -> Self {
        Self { name, kind }
    }

    /// Option name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Option kind.
    #[must_use]
    pub const fn kind(&self) -> &OptionKind {
        &self.kind
    }

    /// Value used when no raw text is supplied.
    #[must_use]
    pub fn default_value(&self) -> OptionValue {
        match &self.kind {
            OptionKind::NullableString | OptionKind::Custom(_) => OptionValue::Null,
            OptionKind::HostKind { default } => OptionValue::HostKind(*default),
            OptionKind::LogLevel { default } => OptionValue::LogLevel(*default),
            OptionKind::Bool { default } => OptionValue::Bool(*default),
            OptionKind::Int { default } => OptionValue::Int(*default),
            OptionKind::Duration { default } => OptionValue::Duration(*default),
        }
    }

    /// Parses raw text into a typed value.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed primitive values and
    /// [`ConfigError::Deserialization`] for malformed payloads.
    pub fn parse(&self, raw: &str) -> Result<OptionValue> {
        let trimmed = raw.trim();
        match &self.kind {
            OptionKind::NullableString => Ok(OptionValue::String(trimmed.to_string())),
            OptionKind::HostKind { .. } => trimmed
                .parse()
                .map(OptionValue::HostKind)
                .map_err(|reason: String| ConfigError::parse(self.name, raw, reason)),
            OptionKind::LogLevel { .. } => trimmed
                .parse()
                .map(OptionValue::LogLevel)
                .map_err(|reason: String| ConfigError::parse(self.name, raw, reason)),
            OptionKind::Bool { .. } => parse_bool(trimmed)
                .map(OptionValue::Bool)
                .ok_or_else(|| ConfigError::parse(self.name, raw, "expected a boolean")),
            OptionKind::Int { .. } => trimmed
                .parse()
                .map(OptionValue::Int)
                .map_err(|e| ConfigError::parse(self.name, raw, e.to_string())),
            OptionKind::Duration { .. } => humantime::parse_duration(trimmed)
                .map(OptionValue::Duration)
                .map_err(|e| ConfigError::parse(self.name, raw, e.to_string())),
            OptionKind::Custom(payload) => payload.decode(self.name, raw),
        }
    }

    /// Parses `raw` when present, otherwise returns the default.
    pub fn parse_or_default(&self, raw: Option<&str>) -> Result<OptionValue> {
        raw.map_or_else(|| Ok(self.default_value()), |raw| self.parse(raw))
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}
