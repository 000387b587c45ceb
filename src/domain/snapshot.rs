//! Telemetry snapshot types
//!
//! `SystemInfo` is the device response decoded once at the client boundary.
//! Every field is optional on the wire and falls back to zero or an empty
//! string, so a partial or oddly-typed response never fails the poll.

use super::magnitude::parse_magnitude;
use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Decoded `/api/system/info` response (only the fields axemon reads)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub temp: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub vr_temp: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub hash_rate: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub expected_hashrate: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub power: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub voltage: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub frequency: f64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub shares_accepted: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub shares_rejected: u64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub best_diff: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub best_session_diff: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub core_voltage_actual: f64,
    #[serde(default, rename = "stratumURL", deserialize_with = "lenient_string")]
    pub stratum_url: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub fanspeed: f64,
}

impl SystemInfo {
    /// Build a snapshot stamped with the given time
    pub fn to_snapshot(&self, timestamp: NaiveDateTime) -> TelemetrySnapshot {
        TelemetrySnapshot {
            timestamp: timestamp.with_nanosecond(0).unwrap_or(timestamp),
            temp: self.temp,
            vr_temp: self.vr_temp,
            hashrate: self.hash_rate,
            expected_hashrate: self.expected_hashrate,
            power: self.power,
            voltage: self.voltage,
            frequency: self.frequency,
            accepted: self.shares_accepted,
            rejected: self.shares_rejected,
            best_diff: empty_as_zero(&self.best_diff),
            session_best: empty_as_zero(&self.best_session_diff),
        }
    }

    /// Fields only shown on the dashboard, never logged
    pub fn extended(&self) -> ExtendedInfo {
        ExtendedInfo {
            frequency: self.frequency,
            core_voltage_actual: self.core_voltage_actual,
            voltage: self.voltage,
            stratum_url: self.stratum_url.clone(),
            fanspeed: self.fanspeed,
        }
    }
}

/// Live display-only device details
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExtendedInfo {
    pub frequency: f64,
    #[serde(rename = "coreVoltageActual")]
    pub core_voltage_actual: f64,
    pub voltage: f64,
    #[serde(rename = "stratumURL")]
    pub stratum_url: String,
    pub fanspeed: f64,
}

/// One device's readings at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    /// Local wall-clock time, second precision
    pub timestamp: NaiveDateTime,
    /// ASIC temperature (°C)
    pub temp: f64,
    /// Voltage regulator temperature (°C)
    pub vr_temp: f64,
    /// Current hashrate (GH/s)
    pub hashrate: f64,
    /// Expected hashrate (GH/s)
    pub expected_hashrate: f64,
    /// Power draw (W)
    pub power: f64,
    /// Input voltage (V)
    pub voltage: f64,
    /// ASIC frequency (MHz)
    pub frequency: f64,
    pub accepted: u64,
    pub rejected: u64,
    /// Best difficulty ever, as reported
    pub best_diff: String,
    /// Best difficulty this session, as reported
    pub session_best: String,
}

impl TelemetrySnapshot {
    /// Current local time truncated to whole seconds
    pub fn now() -> NaiveDateTime {
        let now = Local::now().naive_local();
        now.with_nanosecond(0).unwrap_or(now)
    }

    /// Session-best difficulty as a number (lenient parse)
    pub fn session_best_value(&self) -> f64 {
        parse_magnitude(&self.session_best)
    }
}

fn empty_as_zero(value: &str) -> String {
    if value.is_empty() {
        "0".to_string()
    } else {
        value.to_string()
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => parse_magnitude(&s),
        Some(Value::Bool(b)) => f64::from(u8::from(b)),
        _ => 0.0,
    })
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = lenient_f64(deserializer)?;
    Ok(if value.is_finite() && value > 0.0 {
        value as u64
    } else {
        0
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}
