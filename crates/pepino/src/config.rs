//! Runner configuration read from the environment.
//!
//! Settings come from `PEPINO_*` environment variables and may be overridden
//! by command-line flags. Precedence, highest first: command line,
//! environment, built-in default.

use std::env;
use std::str::FromStr;

use thiserror::Error;

use crate::tags::{TagExprError, TagExpression};

/// Environment variable holding the log level.
pub const LOG_LEVEL_VAR: &str = "PEPINO_LOG_LEVEL";
/// Environment variable holding the tag filter.
pub const TAGS_VAR: &str = "PEPINO_TAGS";

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The log level is not one of the known names.
    #[error("{variable}: unknown log level '{value}', expected one of: trace, debug, info, warn, error")]
    LogLevel {
        /// Source of the value.
        variable: String,
        /// Offending value.
        value: String,
    },
    /// The tag filter does not parse.
    #[error("{variable}: {source}")]
    Tags {
        /// Source of the value.
        variable: String,
        /// Parse failure.
        #[source]
        source: TagExprError,
    },
}

/// Verbosity of engine logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Every record, including per-token lexer output.
    Trace,
    /// Step resolution and hook invocations.
    Debug,
    /// Feature and scenario progress.
    #[default]
    Info,
    /// Skipped rows, scenarios and tokens.
    Warn,
    /// Failures only.
    Error,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(format!(
                "unknown log level '{s}', expected one of: trace, debug, info, warn, error"
            )),
        }
    }
}

impl LogLevel {
    /// Filter directive understood by `tracing_subscriber::EnvFilter`.
    #[must_use]
    pub fn as_filter_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Settings for a feature run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Logging verbosity.
    pub log_level: LogLevel,
    /// Only scenarios satisfying this filter run.
    pub tags: Option<TagExpression>,
}

impl RunnerConfig {
    /// Load configuration from `PEPINO_LOG_LEVEL` and `PEPINO_TAGS`.
    ///
    /// Unset variables fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the variable whose value is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the variable whose value is invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let log_level = lookup(LOG_LEVEL_VAR)
            .map(|value| parse_log_level(LOG_LEVEL_VAR, &value))
            .transpose()?
            .unwrap_or_default();
        let tags = match lookup(TAGS_VAR) {
            Some(value) if !value.trim().is_empty() => Some(parse_tags(TAGS_VAR, &value)?),
            _ => None,
        };
        Ok(Self { log_level, tags })
    }

    /// Layer command-line values over this configuration.
    #[must_use]
    pub fn apply_overrides(
        mut self,
        log_level: Option<LogLevel>,
        tags: Option<TagExpression>,
    ) -> Self {
        if let Some(level) = log_level {
            self.log_level = level;
        }
        if let Some(filter) = tags {
            self.tags = Some(filter);
        }
        self
    }

    /// Replace the log level.
    #[must_use]
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Replace the tag filter.
    #[must_use]
    pub fn with_tags(mut self, tags: TagExpression) -> Self {
        self.tags = Some(tags);
        self
    }
}

/// Parse a log level, attributing a failure to `variable`.
///
/// # Errors
///
/// Returns [`ConfigError::LogLevel`] for unknown names.
pub fn parse_log_level(variable: &str, value: &str) -> Result<LogLevel, ConfigError> {
    value.parse().map_err(|_| ConfigError::LogLevel {
        variable: variable.to_string(),
        value: value.to_string(),
    })
}

/// Parse a tag filter, attributing a failure to `variable`.
///
/// # Errors
///
/// Returns [`ConfigError::Tags`] when the expression is malformed.
pub fn parse_tags(variable: &str, value: &str) -> Result<TagExpression, ConfigError> {
    TagExpression::parse(value).map_err(|source| ConfigError::Tags {
        variable: variable.to_string(),
        source,
    })
}
