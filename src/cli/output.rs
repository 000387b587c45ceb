//! Output formatting utilities
//!
//! Provides table and JSON output formatting for CLI commands.

use crate::cli::args::OutputFormat;
use crate::domain::{format_magnitude, TelemetrySnapshot};
use crate::telemetry::LogReport;
use serde::Serialize;
use std::io::{self, Write};

/// Format and print output based on the selected format
pub fn print_output<T: Serialize + TableDisplay>(data: &T, format: OutputFormat) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match format {
        OutputFormat::Table => {
            writeln!(handle, "{}", data.to_table())?;
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string());
            writeln!(handle, "{}", json)?;
        }
        OutputFormat::Compact => {
            writeln!(handle, "{}", data.to_compact())?;
        }
    }

    Ok(())
}

/// Trait for types that can be displayed as a table
pub trait TableDisplay {
    /// Format as a table string
    fn to_table(&self) -> String;

    /// Format as a compact single line
    fn to_compact(&self) -> String {
        self.to_table().replace('\n', " | ")
    }
}

/// One device's answer to a one-off poll
#[derive(Debug, Clone, Serialize)]
pub struct PollEntry {
    pub device: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<TelemetrySnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TableDisplay for PollEntry {
    fn to_table(&self) -> String {
        match (&self.snapshot, &self.error) {
            (Some(s), _) => format!(
                "{:<16} {:>9.1} GH/s  ASIC {:>5.1}°C  VR {:>5.1}°C  {:>5.1} W  A:{} R:{}  Best {} / {}",
                self.device,
                s.hashrate,
                s.temp,
                s.vr_temp,
                s.power,
                s.accepted,
                s.rejected,
                s.session_best,
                s.best_diff
            ),
            (None, Some(e)) => format!("{:<16} unreachable: {}", self.device, e),
            (None, None) => format!("{:<16} no data", self.device),
        }
    }

    fn to_compact(&self) -> String {
        match &self.snapshot {
            Some(s) => format!("{}:{:.0}GH/s:{:.0}°C", self.device, s.hashrate, s.temp),
            None => format!("{}:down", self.device),
        }
    }
}

/// Results of polling the fleet once
#[derive(Debug, Clone, Serialize)]
pub struct PollResults {
    pub devices: Vec<PollEntry>,
}

impl PollResults {
    /// Devices that answered
    pub fn reachable(&self) -> usize {
        self.devices.iter().filter(|d| d.snapshot.is_some()).count()
    }
}

impl TableDisplay for PollResults {
    fn to_table(&self) -> String {
        let mut output = format!(
            "Devices reachable: {}/{}\n\n",
            self.reachable(),
            self.devices.len()
        );
        for entry in &self.devices {
            output.push_str(&entry.to_table());
            output.push('\n');
        }
        output
    }

    fn to_compact(&self) -> String {
        self.devices
            .iter()
            .map(|d| d.to_compact())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Aggregates for one device, flattened for display
#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    pub device: String,
    pub samples: usize,
    pub avg_hashrate: i64,
    pub max_hashrate: f64,
    pub avg_temp: i64,
    pub avg_vrtemp: i64,
    pub last_seen: Option<String>,
    pub session_best: String,
    pub best_diff: String,
}

/// Log replay summary
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub duration: String,
    pub devices: Vec<ReportRow>,
}

impl From<&LogReport> for ReportSummary {
    fn from(report: &LogReport) -> Self {
        let devices = report
            .devices
            .iter()
            .map(|id| {
                let series = report.series.get(id);
                let averages = report.averages.get(id);
                let latest = report.latest.get(id);
                let best = report
                    .session_best
                    .get(id)
                    .and_then(|h| h.iter().map(|s| s.value).reduce(f64::max));
                ReportRow {
                    device: id.clone(),
                    samples: series.map_or(0, |s| s.len()),
                    avg_hashrate: averages.map_or(0, |a| a.hashrate),
                    max_hashrate: report.max_hashrate.get(id).copied().unwrap_or(0.0),
                    avg_temp: averages.map_or(0, |a| a.temp),
                    avg_vrtemp: averages.map_or(0, |a| a.vrtemp),
                    last_seen: series.and_then(|s| s.time.last().cloned()),
                    session_best: best.map(format_magnitude).unwrap_or_default(),
                    best_diff: latest.map(|l| l.bestdiff.clone()).unwrap_or_default(),
                }
            })
            .collect();

        Self {
            duration: report.duration.clone(),
            devices,
        }
    }
}

impl TableDisplay for ReportSummary {
    fn to_table(&self) -> String {
        let mut output = format!(
            "Log span: {}\nDevices: {}\n\n",
            self.duration,
            self.devices.len()
        );
        output.push_str(&format!(
            "{:<16} {:>7} {:>9} {:>9} {:>6} {:>6} {:>10} {:>10}  {}\n",
            "DEVICE", "SAMPLES", "AVG GH/s", "MAX GH/s", "ASIC", "VR", "SESSION", "BEST", "LAST SEEN"
        ));
        for row in &self.devices {
            output.push_str(&format!(
                "{:<16} {:>7} {:>9} {:>9.1} {:>6} {:>6} {:>10} {:>10}  {}\n",
                row.device,
                row.samples,
                row.avg_hashrate,
                row.max_hashrate,
                row.avg_temp,
                row.avg_vrtemp,
                row.session_best,
                row.best_diff,
                row.last_seen.as_deref().unwrap_or("-")
            ));
        }
        output
    }

    fn to_compact(&self) -> String {
        let rows: Vec<String> = self
            .devices
            .iter()
            .map(|r| format!("{}:{}GH/s:{}°C", r.device, r.avg_hashrate, r.avg_temp))
            .collect();
        format!("{} [{}]", self.duration, rows.join(", "))
    }
}

/// Pool status line
#[derive(Debug, Clone, Serialize)]
pub struct PoolStatusView {
    pub status: String,
}

impl TableDisplay for PoolStatusView {
    fn to_table(&self) -> String {
        self.status.clone()
    }
}

/// Simple message output
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub message: String,
    pub success: bool,
}

impl TableDisplay for Message {
    fn to_table(&self) -> String {
        if self.success {
            format!("✓ {}", self.message)
        } else {
            format!("✗ {}", self.message)
        }
    }
}
