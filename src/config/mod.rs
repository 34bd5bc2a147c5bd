//! Configuration handling for the API server.
//!
//! Everything is read from environment variables with development defaults.
//! Engine bounds (fetch timeout, body limit, card cap) are constants in the
//! engine, not settings.

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

/// Environment variable names.
pub const ENV_BIND_ADDR: &str = "BIND_ADDR";
pub const ENV_RATE_LIMIT_MAX_REQUESTS: &str = "RATE_LIMIT_MAX_REQUESTS";
pub const ENV_RATE_LIMIT_WINDOW_SECS: &str = "RATE_LIMIT_WINDOW_SECS";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_RATE_LIMIT_MAX_REQUESTS: u32 = 30;
const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 60;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("expected 'text' or 'json', got '{}'", other)),
        }
    }
}

/// Application runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    bind_addr: String,
    rate_limit_max_requests: u32,
    rate_limit_window: Duration,
    log_format: LogFormat,
}

impl Config {
    pub fn new(
        bind_addr: impl Into<String>,
        rate_limit_max_requests: u32,
        rate_limit_window: Duration,
        log_format: LogFormat,
    ) -> Self {
        Self {
            bind_addr: bind_addr.into(),
            rate_limit_max_requests,
            rate_limit_window,
            log_format,
        }
    }

    /// Load from environment variables, falling back to development defaults.
    /// Present but malformed values are an error, not silently replaced.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = env::var(ENV_BIND_ADDR).unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let rate_limit_max_requests =
            parse_var(ENV_RATE_LIMIT_MAX_REQUESTS, DEFAULT_RATE_LIMIT_MAX_REQUESTS)?;
        let window_secs = parse_var(ENV_RATE_LIMIT_WINDOW_SECS, DEFAULT_RATE_LIMIT_WINDOW_SECS)?;
        let log_format = parse_var(ENV_LOG_FORMAT, LogFormat::default())?;

        if rate_limit_max_requests == 0 {
            return Err(ConfigError::InvalidValue {
                field: ENV_RATE_LIMIT_MAX_REQUESTS,
                reason: "must be at least 1".to_string(),
            });
        }
        if window_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: ENV_RATE_LIMIT_WINDOW_SECS,
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            bind_addr,
            rate_limit_max_requests,
            rate_limit_window: Duration::from_secs(window_secs),
            log_format,
        })
    }

    /// TCP bind address (host:port) for the HTTP server.
    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }
    /// Requests one client IP may make per window on `/v1`.
    pub fn rate_limit_max_requests(&self) -> u32 {
        self.rate_limit_max_requests
    }
    pub fn rate_limit_window(&self) -> Duration {
        self.rate_limit_window
    }
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Development defaults (mirrors `from_env` with no env overrides).
    pub fn default() -> Self {
        Self::new(
            DEFAULT_BIND_ADDR,
            DEFAULT_RATE_LIMIT_MAX_REQUESTS,
            Duration::from_secs(DEFAULT_RATE_LIMIT_WINDOW_SECS),
            LogFormat::default(),
        )
    }
}

fn parse_var<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            field: key,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

/// Errors that can occur while building a configuration.
#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}
