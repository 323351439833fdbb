//! Enumerated option types shared by the driver and the subject process.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of application host the agent runs inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AppCodeHostKind {
    /// Not configured.
    #[default]
    NotSet,
    /// Script executed by the CLI interpreter.
    CliScript,
    /// Script served by the interpreter's built-in HTTP server.
    CliBuiltinHttpServer,
    /// Script served by an external HTTP server.
    ExternalHttpServer,
}

impl AppCodeHostKind {
    /// All host kinds.
    pub const ALL: [Self; 4] = [
        Self::NotSet,
        Self::CliScript,
        Self::CliBuiltinHttpServer,
        Self::ExternalHttpServer,
    ];

    /// Returns the canonical textual form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotSet => "not_set",
            Self::CliScript => "cli_script",
            Self::CliBuiltinHttpServer => "cli_builtin_http_server",
            Self::ExternalHttpServer => "external_http_server",
        }
    }

    /// Host kind a run actually uses; an unset kind runs as a CLI script.
    #[must_use]
    pub const fn resolved(self) -> Self {
        match self {
            Self::NotSet => Self::CliScript,
            other => other,
        }
    }

    /// Returns true if requests reach app code over HTTP.
    #[must_use]
    pub const fn is_http(&self) -> bool {
        matches!(self, Self::CliBuiltinHttpServer | Self::ExternalHttpServer)
    }
}

impl fmt::Display for AppCodeHostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppCodeHostKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown app code host kind `{s}`"))
    }
}

/// Harness log level, ordered from least to most verbose.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Logging disabled.
    Off,
    /// Critical failures only.
    Critical,
    /// Errors.
    Error,
    /// Warnings.
    Warning,
    /// Notable but normal events.
    Notice,
    /// Informational.
    Info,
    /// Debug.
    Debug,
    /// Everything.
    #[default]
    Trace,
}

impl LogLevel {
    /// All log levels.
    pub const ALL: [Self; 8] = [
        Self::Off,
        Self::Critical,
        Self::Error,
        Self::Warning,
        Self::Notice,
        Self::Info,
        Self::Debug,
        Self::Trace,
    ];

    /// Returns the canonical textual form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Critical => "critical",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Notice => "notice",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }

    /// Returns the closest `tracing` filter directive.
    #[must_use]
    pub const fn as_filter_directive(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Critical | Self::Error => "error",
            Self::Warning => "warn",
            Self::Notice | Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown log level `{s}`"))
    }
}
