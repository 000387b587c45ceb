//! Configuration system
//!
//! Handles TOML config file parsing and CLI argument merging.

pub mod builder;
pub mod file;

pub use builder::ConfigBuilder;
pub use file::ConfigFile;

use crate::alerts::AlertThresholds;
use crate::device::http::{DEFAULT_INFO_PATH, DEFAULT_RESTART_PATH};
use crate::domain::DeviceEndpoint;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// File locations
    pub general: GeneralConfig,
    /// Devices to manage
    pub fleet: FleetConfig,
    /// Telemetry collection loop
    pub collector: CollectorConfig,
    /// Temperature and record alerts
    pub alerts: AlertsConfig,
    /// Log rotation
    pub rotation: RotationConfig,
    /// Scheduled restarts
    pub restart: RestartConfig,
    /// HTTP API
    pub server: ServerConfig,
    /// Telegram bot credentials
    pub telegram: TelegramConfig,
}

impl Config {
    /// Check every interval, timeout and threshold for a usable value
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("collector.interval_secs", self.collector.interval_secs),
            ("collector.timeout_secs", self.collector.timeout_secs),
            ("alerts.interval_secs", self.alerts.interval_secs),
            ("alerts.timeout_secs", self.alerts.timeout_secs),
            ("rotation.interval_hours", self.rotation.interval_hours),
            ("restart.interval_hours", self.restart.interval_hours),
            ("restart.timeout_secs", self.restart.timeout_secs),
            ("server.extra_timeout_secs", self.server.extra_timeout_secs),
        ];
        for (key, value) in positive {
            if value == 0 {
                return Err(invalid(key, "must be greater than zero"));
            }
        }

        if !self.alerts.temperature_threshold.is_finite() {
            return Err(invalid(
                "alerts.temperature_threshold",
                "must be a finite number",
            ));
        }
        if let Some(vr) = self.alerts.vr_temperature_threshold {
            if !vr.is_finite() {
                return Err(invalid(
                    "alerts.vr_temperature_threshold",
                    "must be a finite number",
                ));
            }
        }

        if self.general.log_file.as_os_str().is_empty() {
            return Err(invalid("general.log_file", "must not be empty"));
        }

        Ok(())
    }

    /// Configured devices, normalized, duplicates removed, order kept
    pub fn devices(&self) -> Vec<DeviceEndpoint> {
        let mut seen = Vec::new();
        for raw in &self.fleet.devices {
            let endpoint = DeviceEndpoint::new(raw);
            if !endpoint.as_str().is_empty() && !seen.contains(&endpoint) {
                seen.push(endpoint);
            }
        }
        seen
    }

    /// Whether `id` names a configured device
    pub fn find_device(&self, id: &str) -> Option<DeviceEndpoint> {
        let wanted = DeviceEndpoint::new(id);
        self.devices().into_iter().find(|d| *d == wanted)
    }

    /// Telegram credentials, if both are set
    pub fn telegram_credentials(&self) -> Option<(&str, &str)> {
        match (&self.telegram.token, &self.telegram.chat_id) {
            (Some(token), Some(chat)) if !token.is_empty() && !chat.is_empty() => {
                Some((token.as_str(), chat.as_str()))
            }
            _ => None,
        }
    }
}

fn invalid(key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    }
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Telemetry log written by the collector
    pub log_file: PathBuf,
    /// Log written by the pool daemon, read-only for us
    pub pool_log: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from("bitaxe_log.txt"),
            pool_log: PathBuf::from("ckpool.log"),
        }
    }
}

/// Fleet configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    /// Device addresses, usually IPv4
    pub devices: Vec<String>,
    /// Status endpoint path
    pub info_path: String,
    /// Restart endpoint path
    pub restart_path: String,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            devices: Vec::new(),
            info_path: DEFAULT_INFO_PATH.to_string(),
            restart_path: DEFAULT_RESTART_PATH.to_string(),
        }
    }
}

/// Collector loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    pub interval_secs: u64,
    pub timeout_secs: u64,
}

impl CollectorConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            interval_secs: 60,
            timeout_secs: 5,
        }
    }
}

/// Alert loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertsConfig {
    pub enabled: bool,
    pub interval_secs: u64,
    pub timeout_secs: u64,
    /// ASIC limit in °C, also used for VR unless overridden
    pub temperature_threshold: f64,
    /// Separate VR limit in °C
    pub vr_temperature_threshold: Option<f64>,
}

impl AlertsConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn thresholds(&self) -> AlertThresholds {
        AlertThresholds {
            asic: self.temperature_threshold,
            vr: self
                .vr_temperature_threshold
                .unwrap_or(self.temperature_threshold),
        }
    }
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 10,
            timeout_secs: 3,
            temperature_threshold: 60.0,
            vr_temperature_threshold: None,
        }
    }
}

/// Log rotation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    pub interval_hours: u64,
}

impl RotationConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_hours * 3600)
    }
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self { interval_hours: 24 }
    }
}

/// Scheduled restart configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RestartConfig {
    pub enabled: bool,
    pub interval_hours: u64,
    pub timeout_secs: u64,
}

impl RestartConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_hours * 3600)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for RestartConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_hours: 24,
            timeout_secs: 5,
        }
    }
}

/// HTTP API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    /// Per-device timeout for the live `/latest-data` extras
    pub extra_timeout_secs: u64,
}

impl ServerConfig {
    /// `bind:port` as a socket address string
    pub fn address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }

    pub fn extra_timeout(&self) -> Duration {
        Duration::from_secs(self.extra_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 19150,
            extra_timeout_secs: 5,
        }
    }
}

/// Telegram bot credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    pub token: Option<String>,
    pub chat_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.collector.interval_secs, 60);
        assert_eq!(config.alerts.interval_secs, 10);
        assert_eq!(config.alerts.timeout_secs, 3);
        assert_eq!(config.server.port, 19150);
        assert_eq!(config.rotation.interval(), Duration::from_secs(86_400));
        assert_eq!(config.general.log_file, PathBuf::from("bitaxe_log.txt"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [fleet]
            devices = ["10.0.0.10", "10.0.0.11/", "10.0.0.10"]

            [alerts]
            temperature_threshold = 65.5
            "#,
        )
        .unwrap();

        assert_eq!(
            config.devices(),
            vec![
                DeviceEndpoint::new("10.0.0.10"),
                DeviceEndpoint::new("10.0.0.11")
            ]
        );
        assert_eq!(config.alerts.thresholds(), AlertThresholds::uniform(65.5));
        assert_eq!(config.fleet.info_path, DEFAULT_INFO_PATH);
        assert_eq!(config.collector.timeout_secs, 5);
    }

    #[test]
    fn test_separate_vr_threshold() {
        let alerts = AlertsConfig {
            vr_temperature_threshold: Some(75.0),
            ..Default::default()
        };
        let thresholds = alerts.thresholds();
        assert_eq!(thresholds.asic, 60.0);
        assert_eq!(thresholds.vr, 75.0);
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let mut config = Config::default();
        config.collector.interval_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { key, .. }) if key == "collector.interval_secs"
        ));
    }

    #[test]
    fn test_validate_rejects_nan_threshold() {
        let mut config = Config::default();
        config.alerts.temperature_threshold = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_find_device() {
        let mut config = Config::default();
        config.fleet.devices = vec!["10.0.0.10".to_string()];
        assert!(config.find_device(" 10.0.0.10 ").is_some());
        assert!(config.find_device("10.0.0.99").is_none());
    }

    #[test]
    fn test_telegram_credentials_need_both() {
        let mut config = Config::default();
        config.telegram.token = Some("t".to_string());
        assert!(config.telegram_credentials().is_none());
        config.telegram.chat_id = Some("c".to_string());
        assert_eq!(config.telegram_credentials(), Some(("t", "c")));
    }
}
