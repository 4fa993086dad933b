// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses and validates every supported key into one explicit ServerConfig object
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration
//!
//! Every setting the server reads is enumerated in [`keys`]. Components
//! receive the parsed [`ServerConfig`] (or a slice of it) instead of looking
//! up environment variables themselves.

use crate::errors::{AppError, AppResult};
use crate::logging::LogFormat;
use crate::nutrition::TargetCommitMode;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Names of every environment key the server reads
pub mod keys {
    /// HTTP listen port
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// Database connection URL
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Advisory (Gemini) API key
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
    /// Advisory model name
    pub const GEMINI_MODEL: &str = "GEMINI_MODEL";
    /// Advisory base URL (overridable for proxies)
    pub const GEMINI_BASE_URL: &str = "GEMINI_BASE_URL";
    /// Advisory call timeout in seconds
    pub const ADVISORY_TIMEOUT_SECS: &str = "ADVISORY_TIMEOUT_SECS";
    /// Deactivate-then-insert serialization policy
    pub const TARGET_COMMIT_MODE: &str = "TARGET_COMMIT_MODE";
    /// Deployment environment
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
    /// Log level
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    /// Full tracing filter directive; overrides `LOG_LEVEL`
    pub const RUST_LOG: &str = "RUST_LOG";
    /// Log output format
    pub const LOG_FORMAT: &str = "LOG_FORMAT";
    /// Record source file and line
    pub const LOG_INCLUDE_LOCATION: &str = "LOG_INCLUDE_LOCATION";
    /// Record span open and close events
    pub const LOG_INCLUDE_SPANS: &str = "LOG_INCLUDE_SPANS";
    /// Comma-separated CORS origins
    pub const CORS_ORIGINS: &str = "CORS_ORIGINS";
}

/// Default values for optional keys
pub mod defaults {
    /// Default HTTP port
    pub const HTTP_PORT: u16 = 5000;
    /// Default `SQLite` database
    pub const DATABASE_URL: &str = "sqlite:./data/macro_tracker.db";
    /// Default advisory model
    pub const GEMINI_MODEL: &str = "gemini-2.5-flash";
    /// Default advisory endpoint
    pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
    /// Default advisory timeout
    pub const ADVISORY_TIMEOUT_SECS: u64 = 30;
    /// Upper bound accepted for the advisory timeout
    pub const MAX_ADVISORY_TIMEOUT_SECS: u64 = 300;
}

/// Strongly typed log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational
    #[default]
    Info,
    /// Debugging detail
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Parse a configured value
    ///
    /// # Errors
    ///
    /// Returns a configuration error for unknown level names
    pub fn parse(s: &str) -> AppResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            other => Err(AppError::config_invalid(
                keys::LOG_LEVEL,
                format!("unknown log level '{other}'"),
            )),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse a configured value
    ///
    /// # Errors
    ///
    /// Returns a configuration error for unknown environment names
    pub fn parse(s: &str) -> AppResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "testing" | "test" => Ok(Self::Testing),
            "development" | "dev" => Ok(Self::Development),
            other => Err(AppError::config_invalid(
                keys::ENVIRONMENT,
                format!("unknown environment '{other}'"),
            )),
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Type-safe database location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum DatabaseUrl {
    /// `SQLite` database with file path
    SQLite {
        /// Database file
        path: PathBuf,
    },
    /// In-memory `SQLite` (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string with validation
    ///
    /// # Errors
    ///
    /// Returns a configuration error for non-`SQLite` URLs or an empty path
    pub fn parse_url(s: &str) -> AppResult<Self> {
        let trimmed = s.trim();
        if trimmed.starts_with("postgres://") || trimmed.starts_with("postgresql://") {
            return Err(AppError::config_invalid(
                keys::DATABASE_URL,
                "only SQLite databases are supported",
            ));
        }

        let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
        match path_str {
            ":memory:" => Ok(Self::Memory),
            "" => Err(AppError::config_invalid(
                keys::DATABASE_URL,
                "database path is empty",
            )),
            path => Ok(Self::SQLite {
                path: PathBuf::from(path),
            }),
        }
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".to_owned(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::SQLite {
            path: PathBuf::from("./data/macro_tracker.db"),
        }
    }
}

impl fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Advisory (AI) service settings
#[derive(Clone, Serialize, Deserialize)]
pub struct AdvisoryConfig {
    /// API key; `None` disables the advisory path entirely
    pub api_key: Option<String>,
    /// Model to request
    pub model: String,
    /// API base URL
    pub base_url: String,
    /// Single finite timeout bounding each advisory call
    pub timeout_secs: u64,
}

impl AdvisoryConfig {
    /// Whether an advisory provider can be constructed
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Timeout as a `Duration`
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl fmt::Debug for AdvisoryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdvisoryConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Server configuration assembled from the environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP API port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Log level
    pub log_level: LogLevel,
    /// Tracing filter directive that replaces `log_level` when set
    pub log_filter: Option<String>,
    /// Log output format
    pub log_format: LogFormat,
    /// Record source locations (always on in production)
    pub log_include_location: bool,
    /// Record span open and close events
    pub log_include_spans: bool,
    /// Database location
    pub database_url: DatabaseUrl,
    /// Advisory service settings
    pub advisory: AdvisoryConfig,
    /// How target/goal version commits are serialized
    pub commit_mode: TargetCommitMode,
    /// CORS allowed origins (`*` allows any)
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables (and `.env` if present)
    ///
    /// # Errors
    ///
    /// Returns a configuration error when any key holds an invalid value
    pub fn from_env() -> AppResult<Self> {
        // A missing .env file is the normal case outside development
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// # Errors
    ///
    /// Returns a configuration error when any key holds an invalid value
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let http_port = match get(keys::HTTP_PORT) {
            Some(raw) => parse_number::<u16>(keys::HTTP_PORT, &raw)?,
            None => defaults::HTTP_PORT,
        };

        let database_url = DatabaseUrl::parse_url(
            &get(keys::DATABASE_URL).unwrap_or_else(|| defaults::DATABASE_URL.to_owned()),
        )?;

        let timeout_secs = match get(keys::ADVISORY_TIMEOUT_SECS) {
            Some(raw) => parse_number::<u64>(keys::ADVISORY_TIMEOUT_SECS, &raw)?,
            None => defaults::ADVISORY_TIMEOUT_SECS,
        };

        let commit_mode = match get(keys::TARGET_COMMIT_MODE) {
            Some(raw) => TargetCommitMode::parse(&raw).ok_or_else(|| {
                AppError::config_invalid(
                    keys::TARGET_COMMIT_MODE,
                    format!("expected 'unserialized' or 'per_user', got '{raw}'"),
                )
            })?,
            None => TargetCommitMode::default(),
        };

        let config = Self {
            http_port,
            environment: get(keys::ENVIRONMENT)
                .map_or(Ok(Environment::default()), |v| Environment::parse(&v))?,
            log_level: get(keys::LOG_LEVEL).map_or(Ok(LogLevel::default()), |v| LogLevel::parse(&v))?,
            log_filter: get(keys::RUST_LOG).map(|v| parse_filter(&v)).transpose()?,
            log_format: get(keys::LOG_FORMAT)
                .map_or(Ok(LogFormat::default()), |v| LogFormat::parse(&v))?,
            log_include_location: get(keys::LOG_INCLUDE_LOCATION)
                .map_or(Ok(false), |v| parse_flag(keys::LOG_INCLUDE_LOCATION, &v))?,
            log_include_spans: get(keys::LOG_INCLUDE_SPANS)
                .map_or(Ok(false), |v| parse_flag(keys::LOG_INCLUDE_SPANS, &v))?,
            database_url,
            advisory: AdvisoryConfig {
                api_key: get(keys::GEMINI_API_KEY),
                model: get(keys::GEMINI_MODEL).unwrap_or_else(|| defaults::GEMINI_MODEL.to_owned()),
                base_url: get(keys::GEMINI_BASE_URL)
                    .unwrap_or_else(|| defaults::GEMINI_BASE_URL.to_owned()),
                timeout_secs,
            },
            commit_mode,
            cors_origins: parse_origins(&get(keys::CORS_ORIGINS).unwrap_or_else(|| "*".to_owned())),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns a configuration error for out-of-range values
    pub fn validate(&self) -> AppResult<()> {
        if self.http_port == 0 {
            return Err(AppError::config_invalid(
                keys::HTTP_PORT,
                "port must be non-zero",
            ));
        }

        if !(1..=defaults::MAX_ADVISORY_TIMEOUT_SECS).contains(&self.advisory.timeout_secs) {
            return Err(AppError::config_invalid(
                keys::ADVISORY_TIMEOUT_SECS,
                format!(
                    "timeout must be between 1 and {} seconds",
                    defaults::MAX_ADVISORY_TIMEOUT_SECS
                ),
            ));
        }

        Ok(())
    }

    /// Conditions worth a warning once logging is up
    #[must_use]
    pub fn startup_warnings(&self) -> Vec<&'static str> {
        let mut warnings = Vec::new();
        if self.environment.is_production() && !self.advisory.is_enabled() {
            warnings.push(
                "GEMINI_API_KEY is not set; nutrition targets will use the formula fallback only",
            );
        }
        warnings
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        let log_filter = self
            .log_filter
            .clone()
            .unwrap_or_else(|| self.log_level.to_string());
        format!(
            "Macro Tracker Server Configuration:\n\
             - HTTP Port: {}\n\
             - Environment: {}\n\
             - Log Level: {} ({})\n\
             - Database: {}\n\
             - Advisory: {} (model {}, timeout {}s)\n\
             - Target Commit Mode: {}",
            self.http_port,
            self.environment,
            log_filter,
            self.log_format,
            self.database_url,
            if self.advisory.is_enabled() {
                "Enabled"
            } else {
                "Disabled"
            },
            self.advisory.model,
            self.advisory.timeout_secs,
            self.commit_mode,
        )
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> AppResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::config_invalid(key, format!("'{raw}' is not a valid number")))
}

fn parse_flag(key: &str, raw: &str) -> AppResult<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(AppError::config_invalid(
            key,
            format!("expected true or false, got '{other}'"),
        )),
    }
}

fn parse_filter(raw: &str) -> AppResult<String> {
    EnvFilter::try_new(raw.trim())
        .map(|_| raw.trim().to_owned())
        .map_err(|e| AppError::config_invalid(keys::RUST_LOG, format!("invalid filter: {e}")))
}

/// Parse comma-separated origins
fn parse_origins(origins: &str) -> Vec<String> {
    origins
        .split(',')
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap_or_else(|e| panic!("{e}"));

        assert_eq!(config.http_port, defaults::HTTP_PORT);
        assert_eq!(config.advisory.timeout_secs, defaults::ADVISORY_TIMEOUT_SECS);
        assert!(!config.advisory.is_enabled());
        assert_eq!(config.commit_mode, TargetCommitMode::Unserialized);
        assert_eq!(config.cors_origins, vec!["*".to_owned()]);
    }

    #[test]
    fn test_blank_api_key_disables_advisory() {
        let config = ServerConfig::from_lookup(lookup(&[(keys::GEMINI_API_KEY, "   ")]))
            .unwrap_or_else(|e| panic!("{e}"));
        assert!(config.advisory.api_key.is_none());
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = ServerConfig::from_lookup(lookup(&[(keys::HTTP_PORT, "eighty")]))
            .err()
            .map(|e| e.code);
        assert_eq!(err, Some(ErrorCode::ConfigInvalid));
    }

    #[test]
    fn test_timeout_must_be_finite_and_bounded() {
        let zero = ServerConfig::from_lookup(lookup(&[(keys::ADVISORY_TIMEOUT_SECS, "0")]));
        assert!(zero.is_err());

        let huge = ServerConfig::from_lookup(lookup(&[(keys::ADVISORY_TIMEOUT_SECS, "100000")]));
        assert!(huge.is_err());
    }

    #[test]
    fn test_commit_mode_parsing() {
        let config = ServerConfig::from_lookup(lookup(&[(keys::TARGET_COMMIT_MODE, "per_user")]))
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(config.commit_mode, TargetCommitMode::PerUser);

        assert!(ServerConfig::from_lookup(lookup(&[(keys::TARGET_COMMIT_MODE, "locked")])).is_err());
    }

    #[test]
    fn test_database_url_parsing() {
        assert_eq!(
            DatabaseUrl::parse_url("sqlite::memory:").ok(),
            Some(DatabaseUrl::Memory)
        );
        assert_eq!(
            DatabaseUrl::parse_url("sqlite:./data/test.db").ok(),
            Some(DatabaseUrl::SQLite {
                path: PathBuf::from("./data/test.db")
            })
        );
        assert!(DatabaseUrl::parse_url("postgres://localhost/db").is_err());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ServerConfig::from_lookup(lookup(&[(keys::GEMINI_API_KEY, "secret-key")]))
            .unwrap_or_else(|e| panic!("{e}"));
        let debug = format!("{:?}", config.advisory);

        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_invalid_logging_values_are_rejected() {
        for (key, value) in [
            (keys::LOG_FORMAT, "fancy"),
            (keys::LOG_LEVEL, "loud"),
            (keys::LOG_INCLUDE_SPANS, "sometimes"),
            (keys::RUST_LOG, "a=b=c"),
        ] {
            let err = ServerConfig::from_lookup(lookup(&[(key, value)]))
                .err()
                .map(|e| e.code);
            assert_eq!(err, Some(ErrorCode::ConfigInvalid), "{key}={value}");
        }
    }

    #[test]
    fn test_logging_keys_are_parsed() {
        let config = ServerConfig::from_lookup(lookup(&[
            (keys::LOG_FORMAT, "compact"),
            (keys::LOG_INCLUDE_LOCATION, "true"),
            (keys::LOG_INCLUDE_SPANS, "0"),
            (keys::RUST_LOG, "info,sqlx=debug"),
        ]))
        .unwrap_or_else(|e| panic!("{e}"));

        assert_eq!(config.log_format, LogFormat::Compact);
        assert!(config.log_include_location);
        assert!(!config.log_include_spans);
        assert_eq!(config.log_filter.as_deref(), Some("info,sqlx=debug"));
    }

    #[test]
    fn test_production_without_api_key_warns_at_startup() {
        let production = ServerConfig::from_lookup(lookup(&[(keys::ENVIRONMENT, "production")]))
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(production.startup_warnings().len(), 1);

        let development =
            ServerConfig::from_lookup(lookup(&[])).unwrap_or_else(|e| panic!("{e}"));
        assert!(development.startup_warnings().is_empty());
    }
}
