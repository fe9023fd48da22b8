use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Result};
use tracing::info;

const DEFAULT_PORT: u16 = 5002;
const DEFAULT_DB_NAME: &str = "message-board";
const DEFAULT_ENVIRONMENT: &str = "development";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 3;

/// Runtime configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Port to bind on all interfaces
    pub port: u16,

    /// MongoDB connection URI
    pub db_connection_string: Option<String>,

    /// Database to use when the URI does not name one
    pub db_name: String,

    /// Environment name, `test` silences request logging
    pub environment: String,

    /// Startup connect timeout, also used as the driver's server selection timeout
    pub connect_timeout: Duration,

    /// Hide raw error messages from HTTP clients
    pub redact_errors: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            db_connection_string: None,
            db_name: DEFAULT_DB_NAME.to_string(),
            environment: DEFAULT_ENVIRONMENT.to_string(),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            redact_errors: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let environment = lookup("APP_ENV")
            .or_else(|| lookup("NODE_ENV"))
            .unwrap_or(defaults.environment);

        let connect_timeout = Duration::from_secs(parse_or(
            &lookup,
            "DB_CONNECT_TIMEOUT_SECS",
            DEFAULT_CONNECT_TIMEOUT_SECS,
        )?);

        let redact_errors = match lookup("REDACT_ERRORS") {
            Some(value) => parse_flag("REDACT_ERRORS", &value)?,
            None => false,
        };

        Ok(Self {
            port: parse_or(&lookup, "PORT", defaults.port)?,
            db_connection_string: lookup("DB_CONNECTION_STRING").filter(|s| !s.trim().is_empty()),
            db_name: lookup("DB_NAME").unwrap_or(defaults.db_name),
            environment,
            connect_timeout,
            redact_errors,
        })
    }

    /// Request logging is suppressed while running under test
    pub fn log_requests(&self) -> bool {
        self.environment != "test"
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e| anyhow!("invalid {key} value {value:?}: {e}")),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(anyhow!("invalid {key} value {other:?}: expected a boolean")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.port, 5002);
        assert!(config.db_connection_string.is_none());
        assert!(config.log_requests());
    }

    #[test]
    fn test_reads_values() {
        let config = Config::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("DB_CONNECTION_STRING", "mongodb://db:27017/board"),
            ("DB_NAME", "other"),
            ("DB_CONNECT_TIMEOUT_SECS", "10"),
            ("REDACT_ERRORS", "true"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(
            config.db_connection_string.as_deref(),
            Some("mongodb://db:27017/board")
        );
        assert_eq!(config.db_name, "other");
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert!(config.redact_errors);
    }

    #[test]
    fn test_test_environment_silences_requests() {
        let config = Config::from_lookup(lookup(&[("NODE_ENV", "test")])).unwrap();
        assert!(!config.log_requests());

        let config =
            Config::from_lookup(lookup(&[("APP_ENV", "production"), ("NODE_ENV", "test")]))
                .unwrap();
        assert!(config.log_requests());
    }

    #[test]
    fn test_blank_connection_string_is_absent() {
        let config = Config::from_lookup(lookup(&[("DB_CONNECTION_STRING", "  ")])).unwrap();
        assert!(config.db_connection_string.is_none());
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(Config::from_lookup(lookup(&[("PORT", "not-a-port")])).is_err());
        assert!(Config::from_lookup(lookup(&[("REDACT_ERRORS", "maybe")])).is_err());
    }
}
