//! Log rotation
//!
//! Bounds disk usage by emptying the telemetry and pool logs once per
//! interval. History is discarded, not archived.

use crate::error::TelemetryError;
use crate::telemetry::LogWriter;

use std::time::Duration;

/// Periodic truncation of both logs
pub struct Rotation {
    writer: LogWriter,
    interval: Duration,
}

impl Rotation {
    pub fn new(writer: LogWriter, interval: Duration) -> Self {
        Self { writer, interval }
    }

    /// Truncate both logs now
    pub fn rotate(&self) -> Result<(), TelemetryError> {
        self.writer.truncate()?;
        log::info!("Logs cleared");
        Ok(())
    }

    /// Sleep one interval, rotate, repeat
    pub fn run(self) {
        log::info!("Log rotation every {:?}", self.interval);
        loop {
            std::thread::sleep(self.interval);
            if let Err(e) = self.rotate() {
                log::warn!("Log rotation failed: {}", e);
            }
        }
    }
}
