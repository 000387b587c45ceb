//! Telemetry log line grammar
//!
//! One snapshot per line:
//!
//! ```text
//! [2025-03-01 12:00:05] 10.0.0.5 -> Temp: 58.5°C | VRTemp: 49°C | Hashrate: 512.3/550 GH/s | Power: 14.2W | Voltage: 5.1V | Frequency: 525 MHz | Accepted: 1200 | Rejected: 3 | BestDiff: 4.29G | SessionBest: 12.5M
//! ```
//!
//! Field order and literal separators are part of the format. Lines that
//! deviate are rejected, never partially read.

use crate::domain::{DeviceEndpoint, TelemetrySnapshot};

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Timestamp layout inside the leading brackets
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static LINE: Lazy<Regex> = Lazy::new(|| {
    let num = r"([\d.eE+-]+)";
    let magnitude = r"([\d.]+ ?[kMG]?)";
    let pattern = format!(
        r"^\[(\d{{4}}-\d{{2}}-\d{{2}} \d{{2}}:\d{{2}}:\d{{2}})\] (\d+(?:\.\d+){{2,}}) -> Temp: {num}°C \| VRTemp: {num}°C \| Hashrate: {num}/{num} GH/s \| Power: {num}W \| Voltage: {num}V \| Frequency: {num} MHz \| Accepted: (\d+) \| Rejected: (\d+) \| BestDiff: {magnitude} \| SessionBest: {magnitude}$"
    );
    Regex::new(&pattern).expect("log line pattern is valid")
});

/// One encoded snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub timestamp: NaiveDateTime,
    pub device: String,
    pub temp: f64,
    pub vr_temp: f64,
    pub hashrate: f64,
    pub expected_hashrate: f64,
    pub power: f64,
    pub voltage: f64,
    pub frequency: f64,
    pub accepted: u64,
    pub rejected: u64,
    pub best_diff: String,
    pub session_best: String,
}

impl LogRecord {
    /// Encode a snapshot taken from `endpoint`
    pub fn new(endpoint: &DeviceEndpoint, snapshot: &TelemetrySnapshot) -> Self {
        Self {
            timestamp: snapshot.timestamp,
            device: endpoint.as_str().to_string(),
            temp: snapshot.temp,
            vr_temp: snapshot.vr_temp,
            hashrate: snapshot.hashrate,
            expected_hashrate: snapshot.expected_hashrate,
            power: snapshot.power,
            voltage: snapshot.voltage,
            frequency: snapshot.frequency,
            accepted: snapshot.accepted,
            rejected: snapshot.rejected,
            best_diff: snapshot.best_diff.clone(),
            session_best: snapshot.session_best.clone(),
        }
    }

    /// Parse one line; `None` if it does not match the grammar exactly
    pub fn parse(line: &str) -> Option<Self> {
        let caps = LINE.captures(line.trim())?;
        let float = |i: usize| caps[i].parse::<f64>().ok();
        let int = |i: usize| caps[i].parse::<u64>().ok();

        Some(Self {
            timestamp: NaiveDateTime::parse_from_str(&caps[1], TIMESTAMP_FORMAT).ok()?,
            device: caps[2].to_string(),
            temp: float(3)?,
            vr_temp: float(4)?,
            hashrate: float(5)?,
            expected_hashrate: float(6)?,
            power: float(7)?,
            voltage: float(8)?,
            frequency: float(9)?,
            accepted: int(10)?,
            rejected: int(11)?,
            best_diff: caps[12].to_string(),
            session_best: caps[13].to_string(),
        })
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} -> Temp: {}°C | VRTemp: {}°C | Hashrate: {}/{} GH/s | Power: {}W | \
             Voltage: {}V | Frequency: {} MHz | Accepted: {} | Rejected: {} | \
             BestDiff: {} | SessionBest: {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.device,
            self.temp,
            self.vr_temp,
            self.hashrate,
            self.expected_hashrate,
            self.power,
            self.voltage,
            self.frequency,
            self.accepted,
            self.rejected,
            self.best_diff,
            self.session_best,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SystemInfo;
    use chrono::NaiveDate;

    const SAMPLE: &str = "[2025-03-01 12:00:05] 10.0.0.5 -> Temp: 58.5°C | VRTemp: 49°C | \
        Hashrate: 512.3/550 GH/s | Power: 14.2W | Voltage: 5.1V | Frequency: 525 MHz | \
        Accepted: 1200 | Rejected: 3 | BestDiff: 4.29G | SessionBest: 12.5 M";

    fn snapshot() -> TelemetrySnapshot {
        let info = SystemInfo {
            temp: 61.25,
            vr_temp: 48.0,
            hash_rate: 498.731,
            expected_hashrate: 525.0,
            power: 13.9,
            voltage: 5.05,
            frequency: 490.0,
            shares_accepted: 4321,
            shares_rejected: 12,
            best_diff: "2.1G".to_string(),
            best_session_diff: "850k".to_string(),
            ..Default::default()
        };
        info.to_snapshot(
            NaiveDate::from_ymd_opt(2025, 3, 1)
                .unwrap()
                .and_hms_opt(23, 59, 59)
                .unwrap(),
        )
    }

    #[test]
    fn test_parse_sample_line() {
        let record = LogRecord::parse(SAMPLE).unwrap();
        assert_eq!(record.device, "10.0.0.5");
        assert_eq!(record.temp, 58.5);
        assert_eq!(record.vr_temp, 49.0);
        assert_eq!(record.hashrate, 512.3);
        assert_eq!(record.expected_hashrate, 550.0);
        assert_eq!(record.accepted, 1200);
        assert_eq!(record.rejected, 3);
        assert_eq!(record.best_diff, "4.29G");
        assert_eq!(record.session_best, "12.5 M");
    }

    #[test]
    fn test_encode_then_parse_preserves_fields() {
        let endpoint = DeviceEndpoint::new("192.168.1.42");
        let record = LogRecord::new(&endpoint, &snapshot());
        let line = format!("{record}\n");

        let parsed = LogRecord::parse(&line).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_exponent_numbers_accepted() {
        let line = SAMPLE.replace("Power: 14.2W", "Power: 1.42e1W");
        assert_eq!(LogRecord::parse(&line).unwrap().power, 14.2);
    }

    #[test]
    fn test_rejects_deviations() {
        // truncated mid-line
        assert!(LogRecord::parse(&SAMPLE[..40]).is_none());
        // trailing garbage
        assert!(LogRecord::parse(&format!("{SAMPLE} | Extra: 1")).is_none());
        // wrong separator
        assert!(LogRecord::parse(&SAMPLE.replace(" -> ", " => ")).is_none());
        // hostname ids are not part of the grammar
        assert!(LogRecord::parse(&SAMPLE.replace("10.0.0.5", "miner.lan")).is_none());
        // malformed timestamp
        assert!(LogRecord::parse(&SAMPLE.replace("12:00:05", "12:00")).is_none());
        // impossible date
        assert!(LogRecord::parse(&SAMPLE.replace("2025-03-01", "2025-13-45")).is_none());
        // numeric capture that is not a number
        assert!(LogRecord::parse(&SAMPLE.replace("58.5°C", "5.8.5°C")).is_none());
        // unknown magnitude suffix
        assert!(LogRecord::parse(&SAMPLE.replace("4.29G", "4.29T")).is_none());
        assert!(LogRecord::parse("").is_none());
    }
}
