//! Trait definitions for device operations
//!
//! These traits abstract over the miner HTTP API to enable testing with mocks.

use crate::domain::{DeviceEndpoint, SystemInfo, TelemetrySnapshot};
use crate::error::DeviceError;

use std::time::Duration;

/// Trait for talking to one miner at a time
///
/// Every call carries its own timeout; a timeout is the only way a request is
/// abandoned. Failures are values, never panics.
pub trait DeviceClient: Send + Sync {
    /// Fetch and decode the device's system info
    fn system_info(
        &self,
        endpoint: &DeviceEndpoint,
        timeout: Duration,
    ) -> Result<SystemInfo, DeviceError>;

    /// Ask the device to reboot
    fn restart(&self, endpoint: &DeviceEndpoint, timeout: Duration) -> Result<(), DeviceError>;

    /// Poll the device and stamp the reading with the current local time
    fn poll(
        &self,
        endpoint: &DeviceEndpoint,
        timeout: Duration,
    ) -> Result<TelemetrySnapshot, DeviceError> {
        let info = self.system_info(endpoint, timeout)?;
        Ok(info.to_snapshot(TelemetrySnapshot::now()))
    }
}
