//! Server configuration.
//!
//! Layers, lowest precedence first: built-in defaults, an optional TOML
//! file, `CONNECTN_*` environment variables (a `.env` file is loaded by the
//! binary before this runs), then command-line flags applied by the caller.

use crate::code::DEFAULT_CODE_LENGTH;
use crate::registry::DEFAULT_MAX_DIMENSION;
use connectn_engine::MIN_CONNECT;
use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Environment variable overriding the bind host.
pub const ENV_HOST: &str = "CONNECTN_HOST";
/// Environment variable overriding the bind port.
pub const ENV_PORT: &str = "CONNECTN_PORT";
/// Environment variable overriding the board size limit.
pub const ENV_MAX_DIMENSION: &str = "CONNECTN_MAX_DIMENSION";
/// Environment variable overriding the session code length.
pub const ENV_CODE_LENGTH: &str = "CONNECTN_CODE_LENGTH";

/// Settings for `connectn serve`.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[serde(default)]
#[setters(prefix = "with_")]
pub struct ServerConfig {
    /// Address to bind.
    #[setters(into)]
    host: String,

    /// Port to bind.
    port: u16,

    /// Largest accepted board dimension.
    max_dimension: usize,

    /// Length of generated session codes.
    code_length: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            max_dimension: DEFAULT_MAX_DIMENSION,
            code_length: DEFAULT_CODE_LENGTH,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file. Missing keys keep their defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ServerConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ServerConfigError::new(format!("Failed to read config file: {}", e))
        })?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ServerConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(host = %config.host, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Loads the file if given, then applies process environment overrides.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ServerConfigError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        base.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Applies `CONNECTN_*` overrides read through `lookup`.
    pub fn with_env_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ServerConfigError> {
        if let Some(host) = lookup(ENV_HOST) {
            debug!(%host, "Host overridden from environment");
            self.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.port = parse_var(ENV_PORT, &port)?;
        }
        if let Some(max) = lookup(ENV_MAX_DIMENSION) {
            self.max_dimension = parse_var(ENV_MAX_DIMENSION, &max)?;
        }
        if let Some(length) = lookup(ENV_CODE_LENGTH) {
            self.code_length = parse_var(ENV_CODE_LENGTH, &length)?;
        }
        Ok(self)
    }

    /// Checks the settings are usable.
    pub fn validate(&self) -> Result<(), ServerConfigError> {
        if self.host.trim().is_empty() {
            return Err(ServerConfigError::new("Host must not be empty".to_string()));
        }
        if self.max_dimension < MIN_CONNECT {
            return Err(ServerConfigError::new(format!(
                "max_dimension must be at least {} (got {})",
                MIN_CONNECT, self.max_dimension
            )));
        }
        if !(4..=32).contains(&self.code_length) {
            return Err(ServerConfigError::new(format!(
                "code_length must be between 4 and 32 (got {})",
                self.code_length
            )));
        }
        Ok(())
    }

    /// `host:port` as passed to the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ServerConfigError>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| ServerConfigError::new(format!("Invalid {}={:?}: {}", key, raw, e)))
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ServerConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ServerConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 8080\nmax_dimension = 12").unwrap();

        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(*config.port(), 8080);
        assert_eq!(*config.max_dimension(), 12);
        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(*config.code_length(), DEFAULT_CODE_LENGTH);
    }

    #[test]
    fn test_malformed_file_reports_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = \"not a number\"").unwrap();

        let err = ServerConfig::from_file(file.path()).unwrap_err();
        assert!(err.message.starts_with("Failed to parse config"));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [(ENV_PORT, "4000"), (ENV_HOST, "0.0.0.0")].into();
        let config = ServerConfig::default()
            .with_env_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:4000");
    }

    #[test]
    fn test_bad_env_value_rejected() {
        let err = ServerConfig::default()
            .with_env_overrides(|key| (key == ENV_PORT).then(|| "seventy".to_string()))
            .unwrap_err();
        assert!(err.message.contains(ENV_PORT));
        assert!(err.file.ends_with("config.rs"));
    }

    #[test]
    fn test_validate() {
        assert!(ServerConfig::default().validate().is_ok());
        assert!(ServerConfig::default().with_max_dimension(2).validate().is_err());
        assert!(ServerConfig::default().with_code_length(2).validate().is_err());
        assert!(ServerConfig::default().with_host("").validate().is_err());
    }
}
