//! Configuration module for VIDHUB.

use serde::Deserialize;
use std::path::Path;

use crate::{Result, VidhubError};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
    /// Bound on a single store round-trip in milliseconds.
    #[serde(default = "default_query_timeout")]
    pub query_timeout_ms: u64,
}

fn default_db_path() -> String {
    "data/vidhub.db".to_string()
}

fn default_query_timeout() -> u64 {
    5000
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            query_timeout_ms: default_query_timeout(),
        }
    }
}

/// Authentication and token lifecycle configuration.
///
/// The access and refresh key families are distinct on purpose: leaking one
/// secret does not compromise the other.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Signing secret for access tokens (must be set in production).
    #[serde(default)]
    pub access_token_secret: String,
    /// Access token expiry in seconds.
    #[serde(default = "default_access_expiry")]
    pub access_token_expiry_secs: u64,
    /// Signing secret for refresh tokens (must be set in production).
    #[serde(default)]
    pub refresh_token_secret: String,
    /// Refresh token expiry in days.
    #[serde(default = "default_refresh_expiry")]
    pub refresh_token_expiry_days: u64,
    /// Whether auth cookies carry the Secure flag.
    #[serde(default = "default_cookie_secure")]
    pub cookie_secure: bool,
}

fn default_access_expiry() -> u64 {
    900 // 15 minutes
}

fn default_refresh_expiry() -> u64 {
    10
}

fn default_cookie_secure() -> bool {
    true
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token_secret: String::new(),
            access_token_expiry_secs: default_access_expiry(),
            refresh_token_secret: String::new(),
            refresh_token_expiry_days: default_refresh_expiry(),
            cookie_secure: default_cookie_secure(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/vidhub.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Authentication configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&content).map_err(|e| VidhubError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check constraints the type system cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.auth.access_token_secret == self.auth.refresh_token_secret
            && !self.auth.access_token_secret.is_empty()
        {
            return Err(VidhubError::Config(
                "access and refresh token secrets must differ".to_string(),
            ));
        }
        if self.auth.access_token_expiry_secs == 0 {
            return Err(VidhubError::Config(
                "access_token_expiry_secs must be positive".to_string(),
            ));
        }
        if self.auth.refresh_token_expiry_days == 0 {
            return Err(VidhubError::Config(
                "refresh_token_expiry_days must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
