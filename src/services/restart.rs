//! Scheduled restarts
//!
//! Reboots every device once per interval and reports each outcome through
//! the notification channels.

use crate::alerts::{AlertEvent, NotificationManager};
use crate::device::DeviceClient;
use crate::domain::DeviceEndpoint;

use std::sync::Arc;
use std::time::Duration;

/// Periodic fleet reboot
pub struct RestartService<C: DeviceClient> {
    client: Arc<C>,
    notifier: Arc<NotificationManager>,
    devices: Vec<DeviceEndpoint>,
    interval: Duration,
    timeout: Duration,
}

impl<C: DeviceClient> RestartService<C> {
    pub fn new(
        client: Arc<C>,
        notifier: Arc<NotificationManager>,
        devices: Vec<DeviceEndpoint>,
        interval: Duration,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            notifier,
            devices,
            interval,
            timeout,
        }
    }

    /// Restart each device in turn, one event per device
    pub fn restart_all(&self) -> Vec<AlertEvent> {
        let events: Vec<AlertEvent> = self
            .devices
            .iter()
            .map(|device| match self.client.restart(device, self.timeout) {
                Ok(()) => AlertEvent::Restarted {
                    device: device.clone(),
                },
                Err(e) => AlertEvent::RestartFailed {
                    device: device.clone(),
                    reason: e.to_string(),
                },
            })
            .collect();

        self.notifier.notify_batch(&events);
        events
    }

    /// Sleep one interval, restart the fleet, repeat
    pub fn run(self) {
        log::info!(
            "Scheduled restart of {} device(s) every {:?}",
            self.devices.len(),
            self.interval
        );
        loop {
            std::thread::sleep(self.interval);
            self.restart_all();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeviceError;
    use crate::mock::{MockClient, RecordingNotifier};

    #[test]
    fn test_restart_all_reports_each_device() {
        let a = DeviceEndpoint::new("10.0.0.1");
        let b = DeviceEndpoint::new("10.0.0.2");
        let client = Arc::new(MockClient::new());
        client.set_restart_result(&b, Err(DeviceError::HttpError(500)));

        let recorder = RecordingNotifier::new();
        let mut notifier = NotificationManager::new();
        notifier.add_notifier(Box::new(recorder.clone()));

        let service = RestartService::new(
            Arc::clone(&client),
            Arc::new(notifier),
            vec![a.clone(), b.clone()],
            Duration::from_secs(3600),
            Duration::from_secs(5),
        );

        let events = service.restart_all();

        assert_eq!(client.restarts(), vec![a.clone(), b.clone()]);
        assert_eq!(events[0], AlertEvent::Restarted { device: a });
        assert_eq!(
            events[1],
            AlertEvent::RestartFailed {
                device: b,
                reason: "HTTP error 500".to_string()
            }
        );
        assert_eq!(
            recorder.messages(),
            vec![
                "♻️ Restarted: 10.0.0.1",
                "⚠️ Restart error on 10.0.0.2: HTTP error 500"
            ]
        );
    }
}
