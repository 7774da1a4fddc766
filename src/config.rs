//! Configuration loading from TOML with environment overrides.
//!
//! Reads `config.toml` (or the file named by `TRENDCAST_CONFIG`) and
//! deserializes into strongly-typed structs. Every field has a default,
//! so a missing file or a partial file is fine. `PORT` overrides the
//! listening port.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use crate::prompt::DEFAULT_MAX_HORIZON;
use crate::types::ForecastMethod;

/// Config file read when `TRENDCAST_CONFIG` is not set.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Upper bound accepted for `forecast.max_horizon`.
pub const HORIZON_CEILING: usize = 1_000_000;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub forecast: ForecastConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Static model descriptor reported to clients.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ModelConfig {
    pub id: String,
    pub owned_by: String,
    /// Unix timestamp reported as the model's creation time.
    pub created: i64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            id: "trendcast-linear".to_string(),
            owned_by: "local".to_string(),
            created: 1_706_745_600,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ForecastConfig {
    pub method: ForecastMethod,
    pub max_horizon: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            method: ForecastMethod::default(),
            max_horizon: DEFAULT_MAX_HORIZON,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// Emit JSON log lines instead of human-readable output.
    pub json: bool,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::from_toml(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve the config path and load it, then apply environment overrides.
    pub fn from_env() -> Result<Self> {
        let path = std::env::var("TRENDCAST_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::load_or_default(&path)?;
        config.apply_port_override(std::env::var("PORT").ok().as_deref())?;
        Ok(config)
    }

    /// Override `server.port` from a `PORT`-style value.
    pub fn apply_port_override(&mut self, port: Option<&str>) -> Result<()> {
        if let Some(raw) = port {
            self.server.port = raw
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a valid port number, got {raw:?}"))?;
        }
        Ok(())
    }

    /// Socket address the server binds to.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .with_context(|| format!("Invalid bind address {}:{}", self.server.host, self.server.port))
    }

    fn validate(&self) -> Result<()> {
        if self.forecast.max_horizon == 0 || self.forecast.max_horizon > HORIZON_CEILING {
            anyhow::bail!("forecast.max_horizon must be between 1 and {HORIZON_CEILING}");
        }
        if self.model.id.trim().is_empty() {
            anyhow::bail!("model.id must not be empty");
        }
        Ok(())
    }
}
