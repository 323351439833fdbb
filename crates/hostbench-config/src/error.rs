//! Error types for hostbench-config.
//!
//! Every failure names the option it concerns so a broken test can be
//! diagnosed without re-running it.

/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Registry misuse: duplicate, malformed or unknown option name.
    ///
    /// Raised at startup and never recovered from.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A primitive option value could not be parsed.
    #[error("failed to parse option `{option}` from {raw:?}: {reason}")]
    Parse {
        /// Option name.
        option: String,
        /// Raw text that was rejected.
        raw: String,
        /// Why parsing failed.
        reason: String,
    },

    /// A structured payload option could not be decoded from JSON.
    #[error("failed to deserialize option `{option}` from {raw:?}: {reason}")]
    Deserialization {
        /// Option name.
        option: String,
        /// Raw JSON text that was rejected.
        raw: String,
        /// Decoder error message.
        reason: String,
    },

    /// I/O error while reading a configuration file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Creates a parse error for a primitive option.
    #[must_use]
    pub fn parse(option: &str, raw: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            option: option.to_string(),
            raw: raw.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates a deserialization error for a structured payload option.
    #[must_use]
    pub fn deserialization(option: &str, raw: &str, reason: impl Into<String>) -> Self {
        Self::Deserialization {
            option: option.to_string(),
            raw: raw.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns the option this error concerns, if any.
    #[must_use]
    pub fn option(&self) -> Option<&str> {
        match self {
            Self::Parse { option, .. } | Self::Deserialization { option, .. } => Some(option),
            Self::Configuration(_) | Self::Io(_) => None,
        }
    }

    /// Returns true if this error happens at startup and can never be recovered.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}
