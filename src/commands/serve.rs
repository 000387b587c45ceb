//! Serve command implementation
//!
//! Starts every background loop, then blocks serving the HTTP API.

use crate::alerts::NotificationManager;
use crate::api::{self, AppState};
use crate::cli::{Cli, ServeArgs};
use crate::commands::{device_client, load_config, require_devices};
use crate::error::{AppError, Result};
use crate::services::Scheduler;

use std::sync::Arc;

/// Execute the serve command
pub fn run_serve(cli: &Cli, args: &ServeArgs) -> Result<()> {
    let config = load_config(cli)?
        .with_port(args.port)
        .with_bind(args.bind.clone())
        .build()?;
    let devices = require_devices(&config)?;

    for device in devices.iter().filter(|d| !d.is_ip_like()) {
        log::warn!(
            "Device {} is not a dotted address; its log lines will not appear in reports",
            device
        );
    }

    log::info!(
        "Monitoring {} device(s): {}",
        devices.len(),
        devices
            .iter()
            .map(|d| d.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let config = Arc::new(config);
    let client = Arc::new(device_client(&config)?);
    let notifier = Arc::new(NotificationManager::from_credentials(config.telegram_credentials()));

    let handles = Scheduler::new(Arc::clone(&config), Arc::clone(&client), notifier).start()?;
    log::debug!("{} background loop(s) running", handles.len());

    // `client` stays owned here so the blocking client is never dropped on a
    // runtime thread.
    let state = AppState::new(Arc::clone(&config), client.clone());
    let address = config.server.address();

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| AppError::Server(format!("failed to start runtime: {e}")))?;
    runtime.block_on(api::serve(state, &address))
}
