//! Configuration loading and management
//!
//! ```yaml
//! server:
//!   host: 127.0.0.1
//!   port: 3000
//! logging:
//!   filter: info
//! tokens:
//!   bytes: 20
//! events:
//!   capacity: 1024
//! ```
//!
//! Every section and key is optional; missing values take the defaults shown.

use crate::core::error::{ConfigError, SyndicationError, SyndicationResult};
use crate::core::events::EventBus;
use crate::core::token::{DEFAULT_TOKEN_BYTES, MIN_TOKEN_BYTES, OsTokenIssuer};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives; `RUST_LOG` takes precedence when set
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// Bearer token issuance settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Random bytes per generated token
    pub bytes: usize,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            bytes: DEFAULT_TOKEN_BYTES,
        }
    }
}

/// Mutation notification settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Events buffered per subscriber before it lags
    pub capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self { capacity: 1024 }
    }
}

/// Complete configuration for the syndication service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyndicationConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub tokens: TokenConfig,
    pub events: EventsConfig,
}

impl SyndicationConfig {
    /// Load and validate configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> SyndicationResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.display().to_string()),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> SyndicationResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot constrain
    pub fn validate(&self) -> SyndicationResult<()> {
        if self.server.port == 0 {
            return Err(invalid("server.port", self.server.port, "must not be 0"));
        }
        if self.tokens.bytes < MIN_TOKEN_BYTES {
            return Err(invalid(
                "tokens.bytes",
                self.tokens.bytes,
                &format!("must be at least {}", MIN_TOKEN_BYTES),
            ));
        }
        if self.events.capacity == 0 {
            return Err(invalid("events.capacity", self.events.capacity, "must not be 0"));
        }
        Ok(())
    }

    /// Listener address as `host:port`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Token issuer with the configured length
    pub fn token_issuer(&self) -> SyndicationResult<OsTokenIssuer> {
        OsTokenIssuer::with_bytes(self.tokens.bytes)
    }

    /// Event bus with the configured capacity
    pub fn event_bus(&self) -> EventBus {
        EventBus::new(self.events.capacity.max(1))
    }
}

fn invalid(field: &str, value: impl ToString, message: &str) -> SyndicationError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        message: message.to_string(),
    }
    .into()
}

/// Install the global `tracing` subscriber
///
/// `RUST_LOG` overrides the configured filter. Installing twice is harmless:
/// the first subscriber stays in place.
pub fn init_tracing(logging: &LoggingConfig) -> SyndicationResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&logging.filter).map_err(|e| ConfigError::InvalidValue {
            field: "logging.filter".to_string(),
            value: logging.filter.clone(),
            message: e.to_string(),
        })?,
    };

    if tracing_subscriber::fmt().with_env_filter(filter).try_init().is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
    Ok(())
}
