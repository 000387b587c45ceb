//! Append-only telemetry log writer
//!
//! The collector loop is the only caller of [`LogWriter::append`]. Each line is
//! formatted into one buffer and written with a single `write_all` on a file
//! opened in append mode, so a reader never sees two snapshots interleaved.

use super::line::LogRecord;
use crate::domain::{DeviceEndpoint, TelemetrySnapshot};
use crate::error::TelemetryError;

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writer for the telemetry log and owner of its rotation
#[derive(Debug, Clone)]
pub struct LogWriter {
    log_path: PathBuf,
    pool_log_path: PathBuf,
}

impl LogWriter {
    /// Create a writer for the given telemetry and pool-status logs
    pub fn new(log_path: impl Into<PathBuf>, pool_log_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
            pool_log_path: pool_log_path.into(),
        }
    }

    /// Path of the telemetry log
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Append one snapshot, creating the file if needed
    pub fn append(
        &self,
        endpoint: &DeviceEndpoint,
        snapshot: &TelemetrySnapshot,
    ) -> Result<(), TelemetryError> {
        let line = format!("{}\n", LogRecord::new(endpoint, snapshot));

        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .and_then(|mut file| file.write_all(line.as_bytes()))
            .map_err(|source| TelemetryError::Append {
                path: self.log_path.display().to_string(),
                source,
            })
    }

    /// Empty both logs
    ///
    /// Both files are truncated even if the first one fails; the first error
    /// is returned.
    pub fn truncate(&self) -> Result<(), TelemetryError> {
        let main = truncate_file(&self.log_path);
        let pool = truncate_file(&self.pool_log_path);
        main.and(pool)
    }
}

fn truncate_file(path: &Path) -> Result<(), TelemetryError> {
    File::create(path)
        .map(|_| ())
        .map_err(|source| TelemetryError::Truncate {
            path: path.display().to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SystemInfo;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn snapshot(second: u32, hashrate: f64) -> TelemetrySnapshot {
        SystemInfo {
            temp: 55.0,
            vr_temp: 45.0,
            hash_rate: hashrate,
            best_session_diff: "1.2M".to_string(),
            ..Default::default()
        }
        .to_snapshot(
            NaiveDate::from_ymd_opt(2025, 1, 1)
                .unwrap()
                .and_hms_opt(8, 0, second)
                .unwrap(),
        )
    }

    #[test]
    fn test_append_creates_and_appends() {
        let dir = tempdir().unwrap();
        let writer = LogWriter::new(dir.path().join("log.txt"), dir.path().join("pool.log"));
        let endpoint = DeviceEndpoint::new("10.0.0.1");

        writer.append(&endpoint, &snapshot(0, 400.0)).unwrap();
        writer.append(&endpoint, &snapshot(1, 410.0)).unwrap();

        let contents = std::fs::read_to_string(writer.log_path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(contents.ends_with('\n'));
        assert!(lines[0].starts_with("[2025-01-01 08:00:00] 10.0.0.1 -> Temp: 55°C"));
        assert_eq!(LogRecord::parse(lines[1]).unwrap().hashrate, 410.0);
    }

    #[test]
    fn test_truncate_empties_both_logs() {
        let dir = tempdir().unwrap();
        let pool = dir.path().join("pool.log");
        std::fs::write(&pool, "12:00 hashrate 1.2 TH/s\n").unwrap();
        let writer = LogWriter::new(dir.path().join("log.txt"), &pool);

        writer
            .append(&DeviceEndpoint::new("10.0.0.1"), &snapshot(0, 400.0))
            .unwrap();
        writer.truncate().unwrap();

        assert_eq!(std::fs::read(writer.log_path()).unwrap().len(), 0);
        assert_eq!(std::fs::read(&pool).unwrap().len(), 0);
    }

    #[test]
    fn test_append_to_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let writer = LogWriter::new(
            dir.path().join("missing").join("log.txt"),
            dir.path().join("pool.log"),
        );
        let result = writer.append(&DeviceEndpoint::new("10.0.0.1"), &snapshot(0, 1.0));
        assert!(matches!(result, Err(TelemetryError::Append { .. })));
    }
}
