//! Telemetry collector
//!
//! Polls the whole fleet each cycle and appends one log line per device that
//! answered. Polls run concurrently; appends happen afterwards in fleet order
//! so the collector stays the log's only writer.

use crate::device::DeviceClient;
use crate::domain::{DeviceEndpoint, TelemetrySnapshot};
use crate::error::DeviceError;
use crate::telemetry::LogWriter;

use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Outcome of one collection cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleSummary {
    /// Devices polled
    pub polled: usize,
    /// Lines appended to the log
    pub written: usize,
    /// Devices that did not answer
    pub unreachable: usize,
    /// Readings lost to append failures
    pub write_errors: usize,
}

/// Periodic fleet poller feeding the telemetry log
pub struct Collector<C: DeviceClient> {
    client: Arc<C>,
    writer: LogWriter,
    devices: Vec<DeviceEndpoint>,
    interval: Duration,
    timeout: Duration,
}

impl<C: DeviceClient> Collector<C> {
    pub fn new(
        client: Arc<C>,
        writer: LogWriter,
        devices: Vec<DeviceEndpoint>,
        interval: Duration,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            writer,
            devices,
            interval,
            timeout,
        }
    }

    /// Poll every device, then append each reading in fleet order
    pub fn tick(&self) -> CycleSummary {
        let readings = self.poll_all();
        let mut summary = CycleSummary {
            polled: self.devices.len(),
            ..Default::default()
        };

        for (device, reading) in self.devices.iter().zip(readings) {
            match reading {
                Ok(snapshot) => match self.writer.append(device, &snapshot) {
                    Ok(()) => summary.written += 1,
                    Err(e) => {
                        log::warn!("Dropping reading from {}: {}", device, e);
                        summary.write_errors += 1;
                    }
                },
                Err(e) => {
                    log::warn!("Error with {}: {}", device, e);
                    summary.unreachable += 1;
                }
            }
        }

        log::debug!(
            "Collection cycle: {}/{} written, {} unreachable",
            summary.written,
            summary.polled,
            summary.unreachable
        );
        summary
    }

    /// Collect forever, one cycle per interval
    pub fn run(self) {
        log::info!(
            "Collector started: {} device(s) every {:?}, writing {}",
            self.devices.len(),
            self.interval,
            self.writer.log_path().display()
        );
        loop {
            self.tick();
            thread::sleep(self.interval);
        }
    }

    fn poll_all(&self) -> Vec<Result<TelemetrySnapshot, DeviceError>> {
        let client = &*self.client;
        let timeout = self.timeout;

        thread::scope(|scope| {
            let handles: Vec<_> = self
                .devices
                .iter()
                .map(|device| scope.spawn(move || client.poll(device, timeout)))
                .collect();

            handles
                .into_iter()
                .map(|handle| {
                    handle.join().unwrap_or_else(|_| {
                        Err(DeviceError::Unreachable("poll thread panicked".to_string()))
                    })
                })
                .collect()
        })
    }
}
