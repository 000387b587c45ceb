//! Alert service
//!
//! Polls the fleet on its own cadence, runs each reading through the alert
//! engine and forwards the resulting events to the notification channels.

use crate::alerts::{AlertEngine, AlertEvent, AlertThresholds, NotificationManager};
use crate::device::DeviceClient;
use crate::domain::DeviceEndpoint;

use std::sync::Arc;
use std::time::Duration;

/// Alert loop over the whole fleet
pub struct AlertService<C: DeviceClient> {
    client: Arc<C>,
    engine: AlertEngine,
    notifier: Arc<NotificationManager>,
    devices: Vec<DeviceEndpoint>,
    interval: Duration,
    timeout: Duration,
}

impl<C: DeviceClient> AlertService<C> {
    pub fn new(
        client: Arc<C>,
        notifier: Arc<NotificationManager>,
        devices: Vec<DeviceEndpoint>,
        thresholds: AlertThresholds,
        interval: Duration,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            engine: AlertEngine::new(thresholds),
            notifier,
            devices,
            interval,
            timeout,
        }
    }

    /// Seed session-best baselines so the first cycle does not announce
    /// every device's current value as a record
    pub fn warm_up(&mut self) {
        let mut seeded = 0;
        for device in &self.devices {
            match self.client.poll(device, self.timeout) {
                Ok(snapshot) => {
                    self.engine
                        .seed_session_best(device, snapshot.session_best_value());
                    seeded += 1;
                }
                Err(e) => log::debug!("Warm-up skipped {}: {}", device, e),
            }
        }
        log::info!(
            "Alert baselines seeded for {}/{} device(s)",
            seeded,
            self.devices.len()
        );
    }

    /// Poll each device in turn and deliver whatever the engine reports
    pub fn tick(&mut self) -> Vec<AlertEvent> {
        let mut fired = Vec::new();

        for device in &self.devices {
            let snapshot = match self.client.poll(device, self.timeout) {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    log::debug!("Alert check skipped {}: {}", device, e);
                    continue;
                }
            };

            let events = self.engine.evaluate(device, &snapshot);
            self.notifier.notify_batch(&events);
            fired.extend(events);
        }

        if !fired.is_empty() {
            log::debug!("Alert cycle produced {} event(s)", fired.len());
        }
        fired
    }

    /// The engine, for inspection
    pub fn engine(&self) -> &AlertEngine {
        &self.engine
    }

    /// Warm up, then check forever
    pub fn run(mut self) {
        log::info!(
            "Alert loop started: {} device(s) every {:?}, thresholds ASIC {}°C / VR {}°C",
            self.devices.len(),
            self.interval,
            self.engine.thresholds().asic,
            self.engine.thresholds().vr
        );
        self.warm_up();
        loop {
            self.tick();
            std::thread::sleep(self.interval);
        }
    }
}
