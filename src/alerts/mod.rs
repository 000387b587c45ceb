//! Alert and notification system
//!
//! Edge-triggered temperature alerts, session-best records and the channels
//! they are delivered through.

mod engine;
mod notifier;
mod types;

pub use engine::AlertEngine;
pub use notifier::{
    LogNotifier, NotificationManager, Notifier, TelegramNotifier, TELEGRAM_API, TELEGRAM_TIMEOUT,
};
pub use types::{AlertEvent, AlertSeverity, AlertState, AlertThresholds, Sensor, SensorState};
