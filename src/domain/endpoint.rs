//! Device endpoint type

use serde::{Deserialize, Serialize};
use std::fmt;

/// Network address of one miner (hostname or IP)
///
/// The same string is used as the device id in the telemetry log and the API.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceEndpoint(String);

impl DeviceEndpoint {
    /// Create a new endpoint from a host, IP or base URL
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into().trim().trim_end_matches('/').to_string())
    }

    /// The endpoint as written in the log and configuration
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Base URL for HTTP requests
    pub fn base_url(&self) -> String {
        if self.0.starts_with("http://") || self.0.starts_with("https://") {
            self.0.clone()
        } else {
            format!("http://{}", self.0)
        }
    }

    /// Whether the id fits the dotted-number shape the log grammar accepts
    ///
    /// Lines for other ids are written but skipped on replay.
    pub fn is_ip_like(&self) -> bool {
        let parts: Vec<&str> = self.0.split('.').collect();
        parts.len() >= 3
            && parts
                .iter()
                .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
    }
}

impl fmt::Display for DeviceEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceEndpoint {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for DeviceEndpoint {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
