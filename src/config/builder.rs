//! Configuration builder
//!
//! Merges configuration from files, environment and CLI arguments.

use crate::config::{Config, ConfigFile};
use crate::error::ConfigError;

use std::path::PathBuf;

/// Builder for merging configuration sources
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Load configuration from a file
    ///
    /// An explicit path must load; without one the default locations are
    /// searched and defaults kept when none is found.
    pub fn with_file(mut self, path: Option<&str>) -> Result<Self, ConfigError> {
        let file_config = match path {
            Some(path) => Some(ConfigFile::load(path)?),
            None => ConfigFile::load_default(),
        };

        if let Some(cfg) = file_config {
            self.config = cfg;
        }

        Ok(self)
    }

    /// Replace the fleet when devices are given on the command line
    pub fn with_devices(mut self, devices: &[String]) -> Self {
        if !devices.is_empty() {
            self.config.fleet.devices = devices.to_vec();
        }
        self
    }

    /// Override with CLI log file
    pub fn with_log_file(mut self, path: Option<PathBuf>) -> Self {
        if let Some(p) = path {
            self.config.general.log_file = p;
        }
        self
    }

    /// Override with CLI port
    pub fn with_port(mut self, port: Option<u16>) -> Self {
        if let Some(p) = port {
            self.config.server.port = p;
        }
        self
    }

    /// Override with CLI bind address
    pub fn with_bind(mut self, bind: Option<String>) -> Self {
        if let Some(b) = bind {
            self.config.server.bind = b;
        }
        self
    }

    /// Override Telegram credentials (from `TG_TOKEN`/`TG_CHAT_ID` or flags)
    pub fn with_telegram(mut self, token: Option<String>, chat_id: Option<String>) -> Self {
        if let Some(t) = token {
            self.config.telegram.token = Some(t);
        }
        if let Some(c) = chat_id {
            self.config.telegram.chat_id = Some(c);
        }
        self
    }

    /// Validate and return the final configuration
    pub fn build(self) -> Result<Config, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
