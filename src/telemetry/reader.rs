//! Log replay and aggregation
//!
//! Rebuilds every per-device view from the log on each call. There is no
//! incremental index: the file can be truncated by rotation or edited by hand,
//! and the report must always reflect exactly what is on disk.

use super::line::{LogRecord, TIMESTAMP_FORMAT};
use crate::domain::parse_canonical;

use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;

/// Duration reported when no line could be replayed
pub const NO_DURATION: &str = "N/A";

/// Per-device chart series, in log order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeviceTimeSeries {
    pub time: Vec<String>,
    pub hashrate: Vec<f64>,
    pub temp: Vec<f64>,
    pub vrtemp: Vec<f64>,
}

impl DeviceTimeSeries {
    /// Number of samples
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Whether the series holds no samples
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    fn push(&mut self, record: &LogRecord) {
        self.time
            .push(record.timestamp.format(TIMESTAMP_FORMAT).to_string());
        self.hashrate.push(record.hashrate);
        self.temp.push(record.temp);
        self.vrtemp.push(record.vr_temp);
    }
}

/// Last replayed line for a device, integer-truncated for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatestReading {
    pub hashrate: i64,
    pub temp: i64,
    pub vrtemp: i64,
    pub accepted: u64,
    pub rejected: u64,
    pub sessionbest: String,
    pub bestdiff: String,
}

/// Means and peak over every replayed line of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceAggregate {
    pub hashrate: i64,
    pub temp: i64,
    pub vrtemp: i64,
    pub maxhashrate: i64,
}

/// Session-best difficulty at one log line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionBestSample {
    pub timestamp: String,
    pub value: f64,
}

/// Everything derived from one replay of the log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogReport {
    /// Chart series by device
    pub series: BTreeMap<String, DeviceTimeSeries>,
    /// Last line by device (file position wins, not timestamp)
    pub latest: BTreeMap<String, LatestReading>,
    /// Averages by device; devices without lines are absent
    pub averages: BTreeMap<String, DeviceAggregate>,
    /// Span between the oldest and newest line across all devices
    pub duration: String,
    /// Highest hashrate seen by device
    pub max_hashrate: BTreeMap<String, f64>,
    /// Devices with at least one line, sorted
    pub devices: Vec<String>,
    /// Session-best history by device, duplicates kept
    pub session_best: BTreeMap<String, Vec<SessionBestSample>>,
}

impl Default for LogReport {
    fn default() -> Self {
        Self {
            series: BTreeMap::new(),
            latest: BTreeMap::new(),
            averages: BTreeMap::new(),
            duration: NO_DURATION.to_string(),
            max_hashrate: BTreeMap::new(),
            devices: Vec::new(),
            session_best: BTreeMap::new(),
        }
    }
}

impl LogReport {
    /// Replay log text; lines that do not match the grammar are skipped
    pub fn from_text(text: &str) -> Self {
        let mut aggregator = Aggregator::default();
        for record in text.lines().filter_map(LogRecord::parse) {
            aggregator.push(&record);
        }
        aggregator.finish()
    }
}

/// Replay the log file at `path`
///
/// A missing file is an empty report. Any other read failure is logged and
/// also yields an empty report; readers never fail on the log.
pub fn parse_all(path: impl AsRef<Path>) -> LogReport {
    let path = path.as_ref();
    match std::fs::read(path) {
        Ok(bytes) => LogReport::from_text(&String::from_utf8_lossy(&bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => LogReport::default(),
        Err(e) => {
            log::warn!("Failed to read telemetry log {}: {}", path.display(), e);
            LogReport::default()
        }
    }
}

#[derive(Debug, Default)]
struct Totals {
    hashrate: f64,
    temp: f64,
    vrtemp: f64,
    max_hashrate: f64,
    count: u64,
}

#[derive(Debug, Default)]
struct Aggregator {
    series: BTreeMap<String, DeviceTimeSeries>,
    latest: BTreeMap<String, LatestReading>,
    totals: BTreeMap<String, Totals>,
    max_hashrate: BTreeMap<String, f64>,
    session_best: BTreeMap<String, Vec<SessionBestSample>>,
    span: Option<(NaiveDateTime, NaiveDateTime)>,
}

impl Aggregator {
    fn push(&mut self, record: &LogRecord) {
        let device = &record.device;

        self.series.entry(device.clone()).or_default().push(record);

        self.max_hashrate
            .entry(device.clone())
            .and_modify(|max| *max = max.max(record.hashrate))
            .or_insert(record.hashrate);

        self.latest.insert(
            device.clone(),
            LatestReading {
                hashrate: record.hashrate as i64,
                temp: record.temp as i64,
                vrtemp: record.vr_temp as i64,
                accepted: record.accepted,
                rejected: record.rejected,
                sessionbest: record.session_best.clone(),
                bestdiff: record.best_diff.clone(),
            },
        );

        let totals = self.totals.entry(device.clone()).or_insert_with(|| Totals {
            max_hashrate: record.hashrate,
            ..Totals::default()
        });
        totals.hashrate += record.hashrate;
        totals.temp += record.temp;
        totals.vrtemp += record.vr_temp;
        totals.max_hashrate = totals.max_hashrate.max(record.hashrate);
        totals.count += 1;

        self.session_best
            .entry(device.clone())
            .or_default()
            .push(SessionBestSample {
                timestamp: record.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                value: parse_canonical(&record.session_best),
            });

        let ts = record.timestamp;
        self.span = Some(match self.span {
            Some((min, max)) => (min.min(ts), max.max(ts)),
            None => (ts, ts),
        });
    }

    fn finish(self) -> LogReport {
        let averages = self
            .totals
            .into_iter()
            .filter(|(_, t)| t.count > 0)
            .map(|(device, t)| {
                let n = t.count as f64;
                let aggregate = DeviceAggregate {
                    hashrate: (t.hashrate / n) as i64,
                    temp: (t.temp / n) as i64,
                    vrtemp: (t.vrtemp / n) as i64,
                    maxhashrate: t.max_hashrate as i64,
                };
                (device, aggregate)
            })
            .collect();

        let duration = self
            .span
            .map(|(min, max)| format_span((max - min).num_seconds()))
            .unwrap_or_else(|| NO_DURATION.to_string());

        LogReport {
            devices: self.series.keys().cloned().collect(),
            series: self.series,
            latest: self.latest,
            averages,
            duration,
            max_hashrate: self.max_hashrate,
            session_best: self.session_best,
        }
    }
}

fn format_span(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{}h {}m", seconds / 3600, (seconds / 60) % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DeviceEndpoint, SystemInfo};
    use crate::telemetry::LogWriter;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn line(device: &str, time: &str, hashrate: f64, temp: f64, session_best: &str) -> String {
        format!(
            "[2025-03-01 {time}] {device} -> Temp: {temp}°C | VRTemp: 45.5°C | \
             Hashrate: {hashrate}/550 GH/s | Power: 14W | Voltage: 5V | Frequency: 525 MHz | \
             Accepted: 10 | Rejected: 1 | BestDiff: 2.5G | SessionBest: {session_best}\n"
        )
    }

    #[test]
    fn test_series_in_append_order_with_max() {
        let hashrates = [480.0, 512.5, 470.0, 505.0];
        let text: String = hashrates
            .iter()
            .enumerate()
            .map(|(i, h)| line("10.0.0.1", &format!("12:0{i}:00"), *h, 55.0, "1M"))
            .collect();

        let report = LogReport::from_text(&text);
        let series = &report.series["10.0.0.1"];
        assert_eq!(series.len(), 4);
        assert_eq!(series.hashrate, hashrates.to_vec());
        assert_eq!(report.max_hashrate["10.0.0.1"], 512.5);
        assert_eq!(report.averages["10.0.0.1"].maxhashrate, 512);
    }

    #[test]
    fn test_invalid_line_is_skipped() {
        let text = format!(
            "{}this is not a telemetry line\n{}",
            line("10.0.0.1", "12:00:00", 500.0, 55.0, "1M"),
            line("10.0.0.1", "12:01:00", 510.0, 56.0, "1M"),
        );
        let report = LogReport::from_text(&text);
        assert_eq!(report.series["10.0.0.1"].len(), 2);
    }

    #[test]
    fn test_torn_trailing_line_is_skipped() {
        let full = line("10.0.0.1", "12:00:00", 500.0, 55.0, "1M");
        let torn = &line("10.0.0.1", "12:01:00", 510.0, 56.0, "1M")[..70];
        let report = LogReport::from_text(&format!("{full}{torn}"));
        assert_eq!(report.series["10.0.0.1"].len(), 1);
    }

    #[test]
    fn test_averages_latest_and_sorting() {
        let text = format!(
            "{}{}{}",
            line("10.0.0.2", "12:00:00", 500.0, 50.0, "1M"),
            line("10.0.0.1", "12:00:10", 400.0, 61.9, "2M"),
            line("10.0.0.2", "12:01:00", 401.0, 55.0, "3M"),
        );
        let report = LogReport::from_text(&text);

        assert_eq!(report.devices, vec!["10.0.0.1", "10.0.0.2"]);

        let avg = report.averages["10.0.0.2"];
        assert_eq!(avg.hashrate, 450);
        assert_eq!(avg.temp, 52);
        assert_eq!(avg.vrtemp, 45);
        assert_eq!(avg.maxhashrate, 500);

        let latest = &report.latest["10.0.0.2"];
        assert_eq!(latest.hashrate, 401);
        assert_eq!(latest.sessionbest, "3M");
        assert_eq!(report.latest["10.0.0.1"].temp, 61);
    }

    #[test]
    fn test_latest_follows_file_position() {
        let text = format!(
            "{}{}",
            line("10.0.0.1", "13:00:00", 500.0, 55.0, "1M"),
            line("10.0.0.1", "12:00:00", 300.0, 55.0, "1M"),
        );
        let report = LogReport::from_text(&text);
        assert_eq!(report.latest["10.0.0.1"].hashrate, 300);
    }

    #[test]
    fn test_duration_spans_all_devices() {
        let text = format!(
            "{}{}",
            line("10.0.0.1", "10:15:00", 500.0, 55.0, "1M"),
            line("10.0.0.2", "12:45:30", 500.0, 55.0, "1M"),
        );
        assert_eq!(LogReport::from_text(&text).duration, "2h 30m");
        assert_eq!(format_span(26 * 3600 + 5 * 60), "26h 5m");
    }

    #[test]
    fn test_silent_device_is_absent() {
        let text = line("10.0.0.1", "12:00:00", 500.0, 55.0, "1M");
        let report = LogReport::from_text(&text);

        assert!(!report.averages.contains_key("10.0.0.9"));
        assert!(!report.series.contains_key("10.0.0.9"));
        assert_eq!(report.devices, vec!["10.0.0.1"]);
        assert_eq!(report.duration, "0h 0m");
    }

    #[test]
    fn test_session_best_keeps_duplicates() {
        let text: String = ["1.2M", "1.2M", "1.5 M", "850k"]
            .iter()
            .enumerate()
            .map(|(i, sb)| line("10.0.0.1", &format!("12:0{i}:00"), 500.0, 55.0, sb))
            .collect();

        let samples = &LogReport::from_text(&text).session_best["10.0.0.1"];
        let values: Vec<f64> = samples.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![1_200_000.0, 1_200_000.0, 1_500_000.0, 850_000.0]);
        assert_eq!(samples[0].timestamp, "2025-03-01 12:00:00");
    }

    #[test]
    fn test_empty_log_reports_sentinels() {
        let report = LogReport::from_text("garbage\n\n");
        assert_eq!(report, LogReport::default());
        assert_eq!(report.duration, NO_DURATION);
        assert!(report.averages.is_empty());
        assert!(report.devices.is_empty());
    }

    #[test]
    fn test_missing_file_is_empty_report() {
        let dir = tempdir().unwrap();
        let report = parse_all(dir.path().join("nope.txt"));
        assert_eq!(report.duration, NO_DURATION);
    }

    #[test]
    fn test_invalid_utf8_does_not_hide_other_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.txt");
        let mut bytes = line("10.0.0.1", "12:00:00", 500.0, 55.0, "1M").into_bytes();
        bytes.extend_from_slice(&[0xff, 0xfe, b'\n']);
        bytes.extend(line("10.0.0.1", "12:01:00", 501.0, 55.0, "1M").into_bytes());
        std::fs::write(&path, bytes).unwrap();

        assert_eq!(parse_all(&path).series["10.0.0.1"].len(), 2);
    }

    #[test]
    fn test_write_then_read_roundtrip() {
        let dir = tempdir().unwrap();
        let writer = LogWriter::new(dir.path().join("log.txt"), dir.path().join("pool.log"));
        let endpoint = DeviceEndpoint::new("10.0.0.9");
        let info = SystemInfo {
            temp: 58.75,
            vr_temp: 47.25,
            hash_rate: 512.345,
            expected_hashrate: 550.0,
            power: 14.1,
            voltage: 5.02,
            frequency: 525.0,
            shares_accepted: 321,
            shares_rejected: 4,
            best_diff: "4.29G".to_string(),
            best_session_diff: "12.5M".to_string(),
            ..Default::default()
        };
        let taken_at = NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        writer.append(&endpoint, &info.to_snapshot(taken_at)).unwrap();

        let report = parse_all(writer.log_path());
        let latest = &report.latest["10.0.0.9"];
        assert_eq!(latest.hashrate, 512);
        assert_eq!(latest.temp, 58);
        assert_eq!(latest.vrtemp, 47);
        assert_eq!(latest.accepted, 321);
        assert_eq!(latest.rejected, 4);
        assert_eq!(latest.bestdiff, "4.29G");
        assert_eq!(report.series["10.0.0.9"].hashrate, vec![512.345]);
        assert_eq!(report.series["10.0.0.9"].time, vec!["2025-03-01 09:30:00"]);
        assert_eq!(report.session_best["10.0.0.9"][0].value, 12_500_000.0);
        assert_eq!(report.duration, "0h 0m");
    }

    #[test]
    fn test_truncate_then_read_is_empty() {
        let dir = tempdir().unwrap();
        let writer = LogWriter::new(dir.path().join("log.txt"), dir.path().join("pool.log"));
        std::fs::write(
            writer.log_path(),
            line("10.0.0.1", "12:00:00", 500.0, 55.0, "1M"),
        )
        .unwrap();

        writer.truncate().unwrap();
        let report = parse_all(writer.log_path());
        assert!(report.series.is_empty());
        assert_eq!(report.duration, NO_DURATION);
    }
}
