//! Logging configuration for the demo binary.

use core::str::FromStr;

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::DemoError;

/// Environment variable holding the log filter (e.g. `scoped_core=trace`).
pub const LOG_ENV: &str = "HELLO_LOG";

/// Environment variable selecting the log format.
pub const LOG_FORMAT_ENV: &str = "HELLO_LOG_FORMAT";

// ─────────────────────────────────────────────────────────────────────────────
// TracingFormat
// ─────────────────────────────────────────────────────────────────────────────

/// Tracing output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingFormat {
    /// Human-readable colored output (default).
    #[default]
    Pretty,
    /// Compact single-line output.
    Compact,
    /// JSON structured output for log aggregation.
    Json,
}

impl FromStr for TracingFormat {
    type Err = DemoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(DemoError::UnknownFormat(other.to_owned())),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DemoConfig
// ─────────────────────────────────────────────────────────────────────────────

/// How the demo reports what its scoped resources do.
///
/// Logs go to stderr so they never interleave with the demo's own output on
/// stdout.
///
/// # Example
///
/// ```
/// use example::{DemoConfig, TracingFormat};
/// use tracing::Level;
///
/// let config = DemoConfig::new()
///     .with_level(Level::TRACE)
///     .with_format(TracingFormat::Compact)
///     .with_env_filter("scoped_core=trace");
/// assert_eq!(config.format(), TracingFormat::Compact);
/// ```
#[derive(Debug, Clone)]
pub struct DemoConfig {
    /// Maximum log level.
    level: Level,
    /// Output format.
    format: TracingFormat,
    /// Environment filter (e.g., "scoped_core=trace").
    env_filter: Option<String>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            format: TracingFormat::Pretty,
            env_filter: None,
        }
    }
}

impl DemoConfig {
    /// Creates a `DemoConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads [`LOG_ENV`] and [`LOG_FORMAT_ENV`] over the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`DemoError::UnknownFormat`] if [`LOG_FORMAT_ENV`] names no
    /// known format.
    pub fn from_env() -> Result<Self, DemoError> {
        Self::from_vars(
            std::env::var(LOG_ENV).ok(),
            std::env::var(LOG_FORMAT_ENV).ok(),
        )
    }

    fn from_vars(filter: Option<String>, format: Option<String>) -> Result<Self, DemoError> {
        let mut config = Self::default();
        if let Some(filter) = filter.filter(|f| !f.trim().is_empty()) {
            config = config.with_env_filter(filter);
        }
        if let Some(format) = format {
            config = config.with_format(format.parse()?);
        }
        Ok(config)
    }

    /// Sets the maximum log level.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: TracingFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets a custom environment filter string.
    ///
    /// Format: `target=level,target=level,...`
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Returns the configured level.
    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    /// Returns the configured format.
    #[must_use]
    pub fn format(&self) -> TracingFormat {
        self.format
    }

    /// Installs the global subscriber. Does nothing if one is already set.
    pub fn init_tracing(&self) {
        let env_filter = match &self.env_filter {
            Some(filter) => {
                EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(self.level.as_str()))
            }
            None => EnvFilter::new(self.level.as_str()),
        };

        // try_init().ok() ignores errors if already initialized
        match self.format {
            TracingFormat::Pretty => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .pretty()
                            .with_writer(std::io::stderr),
                    )
                    .try_init()
                    .ok();
            }
            TracingFormat::Compact => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .compact()
                            .with_writer(std::io::stderr),
                    )
                    .try_init()
                    .ok();
            }
            TracingFormat::Json => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .json()
                            .with_writer(std::io::stderr),
                    )
                    .try_init()
                    .ok();
            }
        }

        tracing::debug!(
            level = %self.level,
            format = ?self.format,
            "tracing initialized"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = DemoConfig::default();
        assert_eq!(config.level(), Level::WARN);
        assert_eq!(config.format(), TracingFormat::Pretty);
        assert!(config.env_filter.is_none());
    }

    #[test]
    fn builder_methods() {
        let config = DemoConfig::new()
            .with_level(Level::DEBUG)
            .with_format(TracingFormat::Json)
            .with_env_filter("scoped_core=trace");

        assert_eq!(config.level(), Level::DEBUG);
        assert_eq!(config.format(), TracingFormat::Json);
        assert_eq!(config.env_filter.as_deref(), Some("scoped_core=trace"));
    }

    #[test]
    fn format_parses_case_insensitively() {
        assert_eq!(
            "Compact".parse::<TracingFormat>().ok(),
            Some(TracingFormat::Compact)
        );
        assert_eq!(
            " json ".parse::<TracingFormat>().ok(),
            Some(TracingFormat::Json)
        );
        assert!(matches!(
            "xml".parse::<TracingFormat>(),
            Err(DemoError::UnknownFormat(format)) if format == "xml"
        ));
    }

    #[test]
    fn vars_override_defaults() {
        let config =
            DemoConfig::from_vars(Some("scoped_core=trace".into()), Some("compact".into()))
                .unwrap();
        assert_eq!(config.format(), TracingFormat::Compact);
        assert_eq!(config.env_filter.as_deref(), Some("scoped_core=trace"));

        let config = DemoConfig::from_vars(Some("  ".into()), None).unwrap();
        assert!(config.env_filter.is_none());

        assert!(DemoConfig::from_vars(None, Some("yaml".into())).is_err());
    }
}
