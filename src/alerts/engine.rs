//! Alert engine
//!
//! Edge-triggered threshold alerts with hysteresis, plus session-best record
//! tracking. All state lives in the engine and is only reachable through
//! [`AlertEngine::evaluate`]; it starts empty on every process start.

use super::types::{AlertEvent, AlertState, AlertThresholds, Sensor, SensorState};
use crate::domain::{DeviceEndpoint, TelemetrySnapshot};

use std::collections::HashMap;

/// Per-device alert state machine
#[derive(Debug, Default)]
pub struct AlertEngine {
    thresholds: AlertThresholds,
    sensors: HashMap<(DeviceEndpoint, Sensor), SensorState>,
    session_best: HashMap<DeviceEndpoint, f64>,
}

impl AlertEngine {
    /// Create an engine with the given temperature limits
    pub fn new(thresholds: AlertThresholds) -> Self {
        Self {
            thresholds,
            sensors: HashMap::new(),
            session_best: HashMap::new(),
        }
    }

    /// Configured limits
    pub fn thresholds(&self) -> AlertThresholds {
        self.thresholds
    }

    /// Record a session-best baseline without notifying
    pub fn seed_session_best(&mut self, device: &DeviceEndpoint, value: f64) {
        self.session_best.insert(device.clone(), value);
    }

    /// Evaluate one fresh snapshot and return the events it triggers
    ///
    /// A sensor fires once when it goes from at-or-below to above its
    /// threshold and stays silent until it has dropped back. Going back to
    /// normal is silent. A session best strictly above the recorded value
    /// fires and becomes the new record; the first value seen for a device
    /// without a baseline only seeds it.
    pub fn evaluate(
        &mut self,
        device: &DeviceEndpoint,
        snapshot: &TelemetrySnapshot,
    ) -> Vec<AlertEvent> {
        let mut events = Vec::new();

        for sensor in Sensor::ALL {
            let value = match sensor {
                Sensor::Asic => snapshot.temp,
                Sensor::Vr => snapshot.vr_temp,
            };
            if let Some(event) = self.evaluate_sensor(device, sensor, value) {
                events.push(event);
            }
        }

        if let Some(event) = self.evaluate_session_best(device, snapshot) {
            events.push(event);
        }

        events
    }

    fn evaluate_sensor(
        &mut self,
        device: &DeviceEndpoint,
        sensor: Sensor,
        value: f64,
    ) -> Option<AlertEvent> {
        let threshold = self.thresholds.for_sensor(sensor);
        let entry = self.sensors.entry((device.clone(), sensor)).or_default();
        let above = value > threshold;

        let event = (above && entry.state == AlertState::Normal).then(|| AlertEvent::Temperature {
            device: device.clone(),
            sensor,
            value,
            threshold,
        });

        entry.last_value = Some(value);
        entry.state = if above {
            AlertState::Alerting
        } else {
            AlertState::Normal
        };

        event
    }

    fn evaluate_session_best(
        &mut self,
        device: &DeviceEndpoint,
        snapshot: &TelemetrySnapshot,
    ) -> Option<AlertEvent> {
        let value = snapshot.session_best_value();

        match self.session_best.get(device).copied() {
            None => {
                self.session_best.insert(device.clone(), value);
                None
            }
            Some(previous) if value > previous => {
                self.session_best.insert(device.clone(), value);
                Some(AlertEvent::NewSessionBest {
                    device: device.clone(),
                    raw: snapshot.session_best.clone(),
                    value,
                    previous,
                })
            }
            Some(_) => None,
        }
    }

    /// Current state of a sensor, if it has been evaluated
    pub fn sensor_state(&self, device: &DeviceEndpoint, sensor: Sensor) -> Option<SensorState> {
        self.sensors.get(&(device.clone(), sensor)).copied()
    }

    /// Recorded session-best value for a device
    pub fn session_best(&self, device: &DeviceEndpoint) -> Option<f64> {
        self.session_best.get(device).copied()
    }
}
