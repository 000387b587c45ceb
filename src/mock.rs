//! Mock implementations for testing
//!
//! Provides a scripted device client and a recording notifier for exercising
//! the loops without real hardware. Responses are queued per device; once a
//! device's queue is empty the last scripted response repeats.

use crate::alerts::{AlertEvent, Notifier};
use crate::device::DeviceClient;
use crate::domain::{DeviceEndpoint, SystemInfo};
use crate::error::{DeviceError, NotifyError};

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Scripted = Result<SystemInfo, DeviceError>;

/// Mock device client for testing
#[derive(Debug, Default)]
pub struct MockClient {
    responses: Mutex<HashMap<DeviceEndpoint, VecDeque<Scripted>>>,
    last: Mutex<HashMap<DeviceEndpoint, Scripted>>,
    restart_results: Mutex<HashMap<DeviceEndpoint, Result<(), DeviceError>>>,
    restarts: Mutex<Vec<DeviceEndpoint>>,
    polls: Mutex<Vec<(DeviceEndpoint, Duration)>>,
}

impl MockClient {
    /// Create an empty mock; unscripted devices are unreachable
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response for a device
    pub fn push_info(&self, endpoint: &DeviceEndpoint, info: SystemInfo) {
        self.push(endpoint, Ok(info));
    }

    /// Queue a failure for a device
    pub fn push_error(&self, endpoint: &DeviceEndpoint, error: DeviceError) {
        self.push(endpoint, Err(error));
    }

    /// Builder: queue a response with the given ASIC/VR temperatures and session best
    pub fn with_reading(
        self,
        endpoint: &DeviceEndpoint,
        temp: f64,
        vr_temp: f64,
        session_best: &str,
    ) -> Self {
        self.push_info(endpoint, sample_info(temp, vr_temp, session_best));
        self
    }

    /// Set the outcome of restart requests for a device
    pub fn set_restart_result(&self, endpoint: &DeviceEndpoint, result: Result<(), DeviceError>) {
        self.restart_results
            .lock()
            .unwrap()
            .insert(endpoint.clone(), result);
    }

    /// Devices a restart was requested for, in call order
    pub fn restarts(&self) -> Vec<DeviceEndpoint> {
        self.restarts.lock().unwrap().clone()
    }

    /// Devices polled so far with the timeout used, in call order
    pub fn polls(&self) -> Vec<(DeviceEndpoint, Duration)> {
        self.polls.lock().unwrap().clone()
    }

    fn push(&self, endpoint: &DeviceEndpoint, response: Scripted) {
        self.responses
            .lock()
            .unwrap()
            .entry(endpoint.clone())
            .or_default()
            .push_back(response);
    }
}

impl DeviceClient for MockClient {
    fn system_info(
        &self,
        endpoint: &DeviceEndpoint,
        timeout: Duration,
    ) -> Result<SystemInfo, DeviceError> {
        self.polls.lock().unwrap().push((endpoint.clone(), timeout));

        let next = self
            .responses
            .lock()
            .unwrap()
            .get_mut(endpoint)
            .and_then(VecDeque::pop_front);

        let mut last = self.last.lock().unwrap();
        match next {
            Some(response) => {
                last.insert(endpoint.clone(), response.clone());
                response
            }
            None => last
                .get(endpoint)
                .cloned()
                .unwrap_or_else(|| Err(DeviceError::Unreachable("no mock response".to_string()))),
        }
    }

    fn restart(&self, endpoint: &DeviceEndpoint, _timeout: Duration) -> Result<(), DeviceError> {
        self.restarts.lock().unwrap().push(endpoint.clone());
        self.restart_results
            .lock()
            .unwrap()
            .get(endpoint)
            .cloned()
            .unwrap_or(Ok(()))
    }
}

/// A plausible device response with the given temperatures and session best
pub fn sample_info(temp: f64, vr_temp: f64, session_best: &str) -> SystemInfo {
    SystemInfo {
        temp,
        vr_temp,
        hash_rate: 500.0,
        expected_hashrate: 550.0,
        power: 14.5,
        voltage: 5.0,
        frequency: 525.0,
        shares_accepted: 100,
        shares_rejected: 1,
        best_diff: "4.29G".to_string(),
        best_session_diff: session_best.to_string(),
        core_voltage_actual: 1150.0,
        stratum_url: "stratum+tcp://pool.local:3333".to_string(),
        fanspeed: 60.0,
    }
}

/// Notifier that keeps every event it receives
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    events: Arc<Mutex<Vec<AlertEvent>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events received so far, in delivery order
    pub fn events(&self) -> Vec<AlertEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Messages received so far, in delivery order
    pub fn messages(&self) -> Vec<String> {
        self.events().iter().map(AlertEvent::message).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: &AlertEvent) -> Result<(), NotifyError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}
