//! Command handlers
//!
//! Each command handler orchestrates the execution of a CLI command.

pub mod poll;
pub mod pool_status;
pub mod report;
pub mod restart;
pub mod serve;

pub use poll::run_poll;
pub use pool_status::run_pool_status;
pub use report::run_report;
pub use restart::run_restart;
pub use serve::run_serve;

use crate::cli::Cli;
use crate::config::{Config, ConfigBuilder};
use crate::device::HttpDeviceClient;
use crate::domain::DeviceEndpoint;
use crate::error::{AppError, Result};

/// Merge config file, environment and global flags
pub fn load_config(cli: &Cli) -> Result<ConfigBuilder> {
    let builder = ConfigBuilder::new()
        .with_file(cli.config.as_deref())?
        .with_devices(&cli.devices)
        .with_log_file(cli.log_file.clone())
        .with_telegram(cli.tg_token.clone(), cli.tg_chat_id.clone());
    Ok(builder)
}

/// HTTP client using the configured firmware paths
pub fn device_client(config: &Config) -> Result<HttpDeviceClient> {
    let client = HttpDeviceClient::with_paths(&config.fleet.info_path, &config.fleet.restart_path)?;
    Ok(client)
}

/// Configured devices, or an error when there are none
pub fn require_devices(config: &Config) -> Result<Vec<DeviceEndpoint>> {
    let devices = config.devices();
    if devices.is_empty() {
        return Err(AppError::NoDevices);
    }
    Ok(devices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::tempdir;

    #[test]
    fn test_load_config_applies_global_flags() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("axemon.toml");
        std::fs::write(&path, "[fleet]\ndevices = [\"10.0.0.1\"]\n").unwrap();

        let cli = Cli::try_parse_from([
            "axemon",
            "-c",
            path.to_str().unwrap(),
            "--device",
            "10.0.0.5",
            "--log-file",
            "/tmp/miners.log",
            "report",
        ])
        .unwrap();

        let config = load_config(&cli).unwrap().build().unwrap();
        assert_eq!(config.fleet.devices, vec!["10.0.0.5"]);
        assert_eq!(
            config.general.log_file,
            std::path::PathBuf::from("/tmp/miners.log")
        );
    }

    #[test]
    fn test_require_devices() {
        let mut config = Config::default();
        assert!(matches!(require_devices(&config), Err(AppError::NoDevices)));

        config.fleet.devices = vec!["10.0.0.1".to_string()];
        assert_eq!(require_devices(&config).unwrap().len(), 1);
    }

    #[test]
    fn test_missing_config_file_is_reported() {
        let cli = Cli::try_parse_from(["axemon", "-c", "/nonexistent/axemon.toml", "report"])
            .unwrap();
        assert!(matches!(load_config(&cli), Err(AppError::Config(_))));
    }
}
