//! Unified error types for axemon
//!
//! This module defines all error types used throughout the application.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Error talking to a device
    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    /// Error from configuration parsing/validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error reading or writing the telemetry log
    #[error("Telemetry log error: {0}")]
    Telemetry(#[from] TelemetryError),

    /// Device id not part of the configured fleet
    #[error("Unknown device: {0}")]
    UnknownDevice(String),

    /// No devices configured
    #[error("No devices configured")]
    NoDevices,

    /// HTTP API server failure
    #[error("HTTP server error: {0}")]
    Server(String),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of a single device request
///
/// Every consumer treats these as "skip this device this cycle".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// Connection refused, timeout or undecodable response
    #[error("unreachable: {0}")]
    Unreachable(String),

    /// Device answered with a non-2xx status
    #[error("HTTP error {0}")]
    HttpError(u16),
}

/// Errors from the append-only telemetry log
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// Failed to append a line
    #[error("failed to append to {path}: {source}")]
    Append {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to truncate a log during rotation
    #[error("failed to truncate {path}: {source}")]
    Truncate {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from a notification channel
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Transport-level failure (DNS, TLS, timeout)
    #[error("transport failure: {0}")]
    Transport(String),

    /// Remote endpoint rejected the message
    #[error("rejected with HTTP {0}")]
    Rejected(u16),
}

/// Errors from configuration parsing and validation
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Invalid config value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_error_display() {
        let err = DeviceError::HttpError(503);
        assert_eq!(err.to_string(), "HTTP error 503");

        let err = DeviceError::Unreachable("connection refused".to_string());
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidValue {
            key: "collector.interval_secs".to_string(),
            message: "must be greater than zero".to_string(),
        };
        assert!(err.to_string().contains("collector.interval_secs"));
    }

    #[test]
    fn test_telemetry_error_display() {
        let err = TelemetryError::Append {
            path: "bitaxe_log.txt".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("bitaxe_log.txt"));
    }

    #[test]
    fn test_error_conversion() {
        let device_err = DeviceError::HttpError(500);
        let app_err: AppError = device_err.into();
        assert!(matches!(app_err, AppError::Device(_)));
    }
}
