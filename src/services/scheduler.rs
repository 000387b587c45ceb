//! Background loop orchestration
//!
//! Builds every periodic service from the configuration and runs each on its
//! own named thread. The loops share nothing but the device client and the
//! notification channels, both of which are safe for concurrent use.

use crate::alerts::NotificationManager;
use crate::config::Config;
use crate::device::DeviceClient;
use crate::domain::DeviceEndpoint;
use crate::services::{AlertService, Collector, RestartService, Rotation};
use crate::telemetry::LogWriter;

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Starts the collector, alert, rotation and restart loops
pub struct Scheduler<C: DeviceClient + 'static> {
    config: Arc<Config>,
    client: Arc<C>,
    notifier: Arc<NotificationManager>,
}

impl<C: DeviceClient + 'static> Scheduler<C> {
    pub fn new(config: Arc<Config>, client: Arc<C>, notifier: Arc<NotificationManager>) -> Self {
        Self {
            config,
            client,
            notifier,
        }
    }

    /// Names of the loops `start` would spawn, in spawn order
    pub fn loop_names(&self) -> Vec<&'static str> {
        let mut names = vec!["collector"];
        if self.config.alerts.enabled {
            names.push("alerts");
        }
        names.push("rotation");
        if self.config.restart.enabled {
            names.push("restart");
        }
        names
    }

    /// Spawn every enabled loop
    pub fn start(self) -> io::Result<Vec<JoinHandle<()>>> {
        let config = &self.config;
        let devices: Vec<DeviceEndpoint> = config.devices();
        let writer = LogWriter::new(&config.general.log_file, &config.general.pool_log);
        let mut handles = Vec::new();

        let collector = Collector::new(
            Arc::clone(&self.client),
            writer.clone(),
            devices.clone(),
            config.collector.interval(),
            config.collector.timeout(),
        );
        handles.push(spawn("collector", move || collector.run())?);

        if config.alerts.enabled {
            let alerts = AlertService::new(
                Arc::clone(&self.client),
                Arc::clone(&self.notifier),
                devices.clone(),
                config.alerts.thresholds(),
                config.alerts.interval(),
                config.alerts.timeout(),
            );
            handles.push(spawn("alerts", move || alerts.run())?);
        } else {
            log::info!("Alert loop disabled");
        }

        let rotation = Rotation::new(writer, config.rotation.interval());
        handles.push(spawn("rotation", move || rotation.run())?);

        if config.restart.enabled {
            let restart = RestartService::new(
                Arc::clone(&self.client),
                Arc::clone(&self.notifier),
                devices,
                config.restart.interval(),
                config.restart.timeout(),
            );
            handles.push(spawn("restart", move || restart.run())?);
        } else {
            log::info!("Scheduled restarts disabled");
        }

        Ok(handles)
    }
}

fn spawn<F>(name: &str, body: F) -> io::Result<JoinHandle<()>>
where
    F: FnOnce() + Send + 'static,
{
    log::debug!("Spawning {} loop", name);
    thread::Builder::new().name(name.to_string()).spawn(body)
}
