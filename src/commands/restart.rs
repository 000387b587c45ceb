//! Restart command implementation
//!
//! Restarts one device from the configured fleet.

use crate::cli::output::{print_output, Message};
use crate::cli::OutputFormat;
use crate::commands::device_client;
use crate::config::Config;
use crate::device::DeviceClient;
use crate::error::{AppError, Result};

/// Execute the restart command
pub fn run_restart(config: &Config, device: &str, format: OutputFormat) -> Result<()> {
    let endpoint = config
        .find_device(device)
        .ok_or_else(|| AppError::UnknownDevice(device.to_string()))?;

    let client = device_client(config)?;
    client.restart(&endpoint, config.restart.timeout())?;
    log::info!("Restart requested for {}", endpoint);

    let msg = Message {
        message: format!("Restart requested for {}", endpoint),
        success: true,
    };
    print_output(&msg, format)?;

    Ok(())
}
