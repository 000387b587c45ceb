//! Poll command implementation
//!
//! Reads every configured device once without touching the log.

use crate::cli::output::{print_output, PollEntry, PollResults};
use crate::cli::OutputFormat;
use crate::commands::{device_client, require_devices};
use crate::config::Config;
use crate::device::DeviceClient;
use crate::domain::DeviceEndpoint;
use crate::error::Result;

/// Execute the poll command
pub fn run_poll(config: &Config, format: OutputFormat) -> Result<()> {
    let devices = require_devices(config)?;
    let client = device_client(config)?;
    let results = poll_fleet(&client, &devices, config);
    print_output(&results, format)?;
    Ok(())
}

fn poll_fleet<C: DeviceClient>(
    client: &C,
    devices: &[DeviceEndpoint],
    config: &Config,
) -> PollResults {
    let timeout = config.collector.timeout();
    let devices = devices
        .iter()
        .map(|device| match client.poll(device, timeout) {
            Ok(snapshot) => PollEntry {
                device: device.to_string(),
                snapshot: Some(snapshot),
                error: None,
            },
            Err(e) => {
                log::debug!("Poll of {} failed: {}", device, e);
                PollEntry {
                    device: device.to_string(),
                    snapshot: None,
                    error: Some(e.to_string()),
                }
            }
        })
        .collect();
    PollResults { devices }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockClient;

    #[test]
    fn test_poll_fleet_keeps_order_and_errors() {
        let a = DeviceEndpoint::new("10.0.0.1");
        let b = DeviceEndpoint::new("10.0.0.2");
        let client = MockClient::new().with_reading(&b, 50.0, 45.0, "1M");

        let results = poll_fleet(&client, &[a, b], &Config::default());

        assert_eq!(results.devices[0].device, "10.0.0.1");
        assert!(results.devices[0].error.is_some());
        assert_eq!(results.devices[1].snapshot.as_ref().unwrap().temp, 50.0);
        assert_eq!(results.reachable(), 1);
    }
}
