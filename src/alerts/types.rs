//! Alert system domain types
//!
//! Sensors, per-sensor hysteresis state and the events the engine emits.

use crate::domain::DeviceEndpoint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Alert severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AlertSeverity {
    /// Informational, no action needed
    Info,
    /// Attention recommended
    Warning,
    /// Action required
    Critical,
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Temperature sensor on a miner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sensor {
    /// ASIC die temperature
    Asic,
    /// Voltage regulator temperature
    Vr,
}

impl Sensor {
    /// Every sensor the engine evaluates, in evaluation order
    pub const ALL: [Sensor; 2] = [Sensor::Asic, Sensor::Vr];
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asic => write!(f, "ASIC"),
            Self::Vr => write!(f, "VR"),
        }
    }
}

/// Threshold state of one (device, sensor) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AlertState {
    /// At or below threshold (also the state before any reading)
    #[default]
    Normal,
    /// Above threshold; already notified for this crossing
    Alerting,
}

impl fmt::Display for AlertState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Alerting => write!(f, "ALERTING"),
        }
    }
}

/// Last observation of one (device, sensor) pair
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SensorState {
    /// Last value seen, `None` before the first reading
    pub last_value: Option<f64>,
    pub state: AlertState,
}

/// Temperature limits in °C
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertThresholds {
    pub asic: f64,
    pub vr: f64,
}

impl AlertThresholds {
    /// Same limit for every sensor
    pub fn uniform(celsius: f64) -> Self {
        Self {
            asic: celsius,
            vr: celsius,
        }
    }

    /// Limit for a sensor
    pub fn for_sensor(&self, sensor: Sensor) -> f64 {
        match sensor {
            Sensor::Asic => self.asic,
            Sensor::Vr => self.vr,
        }
    }
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self::uniform(60.0)
    }
}

/// Something worth telling the operator about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AlertEvent {
    /// A sensor crossed above its threshold
    Temperature {
        device: DeviceEndpoint,
        sensor: Sensor,
        value: f64,
        threshold: f64,
    },
    /// Session-best difficulty beat the recorded value
    NewSessionBest {
        device: DeviceEndpoint,
        raw: String,
        value: f64,
        previous: f64,
    },
    /// Scheduled restart accepted by the device
    Restarted { device: DeviceEndpoint },
    /// Scheduled restart failed
    RestartFailed {
        device: DeviceEndpoint,
        reason: String,
    },
}

impl AlertEvent {
    /// Device the event is about
    pub fn device(&self) -> &DeviceEndpoint {
        match self {
            Self::Temperature { device, .. }
            | Self::NewSessionBest { device, .. }
            | Self::Restarted { device }
            | Self::RestartFailed { device, .. } => device,
        }
    }

    /// Severity used by notifiers for formatting and log levels
    pub fn severity(&self) -> AlertSeverity {
        match self {
            Self::Temperature { .. } => AlertSeverity::Critical,
            Self::RestartFailed { .. } => AlertSeverity::Warning,
            Self::NewSessionBest { .. } | Self::Restarted { .. } => AlertSeverity::Info,
        }
    }

    /// Human-readable text sent to notification channels
    pub fn message(&self) -> String {
        match self {
            Self::Temperature {
                device,
                sensor,
                value,
                threshold,
            } => format!(
                "🔥 ALERT: {sensor} temperature on {device} = {value}°C (threshold {threshold}°C)"
            ),
            Self::NewSessionBest { device, raw, .. } => {
                format!("🏆 New SessionBest on {device}: {raw}")
            }
            Self::Restarted { device } => format!("♻️ Restarted: {device}"),
            Self::RestartFailed { device, reason } => {
                format!("⚠️ Restart error on {device}: {reason}")
            }
        }
    }
}

impl fmt::Display for AlertEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}
