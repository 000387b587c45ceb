//! HTTP device client
//!
//! Talks to the miner's REST API with a blocking reqwest client. One client is
//! shared by every loop; the per-request timeout is chosen by the caller.

use crate::device::traits::DeviceClient;
use crate::domain::{DeviceEndpoint, SystemInfo};
use crate::error::DeviceError;

use reqwest::blocking::{Client, Response};
use std::time::Duration;

/// Default path of the system info endpoint
pub const DEFAULT_INFO_PATH: &str = "/api/system/info";

/// Default path of the restart endpoint
pub const DEFAULT_RESTART_PATH: &str = "/api/system/restart";

/// reqwest-backed device client
#[derive(Debug, Clone)]
pub struct HttpDeviceClient {
    client: Client,
    info_path: String,
    restart_path: String,
}

impl HttpDeviceClient {
    /// Create a client using the default firmware paths
    pub fn new() -> Result<Self, DeviceError> {
        Self::with_paths(DEFAULT_INFO_PATH, DEFAULT_RESTART_PATH)
    }

    /// Create a client with custom endpoint paths
    pub fn with_paths(
        info_path: impl Into<String>,
        restart_path: impl Into<String>,
    ) -> Result<Self, DeviceError> {
        let client = Client::builder()
            .user_agent(concat!("axemon/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DeviceError::Unreachable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            info_path: normalize_path(info_path.into()),
            restart_path: normalize_path(restart_path.into()),
        })
    }

    fn url(&self, endpoint: &DeviceEndpoint, path: &str) -> String {
        format!("{}{}", endpoint.base_url(), path)
    }
}

impl DeviceClient for HttpDeviceClient {
    fn system_info(
        &self,
        endpoint: &DeviceEndpoint,
        timeout: Duration,
    ) -> Result<SystemInfo, DeviceError> {
        let response = self
            .client
            .get(self.url(endpoint, &self.info_path))
            .timeout(timeout)
            .send()
            .map_err(as_unreachable)?;

        check_status(response)?.json::<SystemInfo>().map_err(as_unreachable)
    }

    fn restart(&self, endpoint: &DeviceEndpoint, timeout: Duration) -> Result<(), DeviceError> {
        let response = self
            .client
            .post(self.url(endpoint, &self.restart_path))
            .timeout(timeout)
            .send()
            .map_err(as_unreachable)?;

        check_status(response).map(|_| ())
    }
}

fn check_status(response: Response) -> Result<Response, DeviceError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(DeviceError::HttpError(status.as_u16()))
    }
}

fn as_unreachable(err: reqwest::Error) -> DeviceError {
    if err.is_timeout() {
        DeviceError::Unreachable("timed out".to_string())
    } else {
        DeviceError::Unreachable(err.to_string())
    }
}

fn normalize_path(path: String) -> String {
    if path.starts_with('/') {
        path
    } else {
        format!("/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let client = HttpDeviceClient::new().unwrap();
        let endpoint = DeviceEndpoint::new("10.0.0.7");
        assert_eq!(
            client.url(&endpoint, &client.info_path),
            "http://10.0.0.7/api/system/info"
        );
        assert_eq!(
            client.url(&endpoint, &client.restart_path),
            "http://10.0.0.7/api/system/restart"
        );
    }

    #[test]
    fn test_custom_paths_are_normalized() {
        let client = HttpDeviceClient::with_paths("system-info", "/system-restart").unwrap();
        assert_eq!(client.info_path, "/system-info");
        assert_eq!(client.restart_path, "/system-restart");
    }

    #[test]
    fn test_unreachable_device() {
        // port 9 on localhost: connection refused, never a panic
        let client = HttpDeviceClient::new().unwrap();
        let endpoint = DeviceEndpoint::new("127.0.0.1:9");
        let result = client.system_info(&endpoint, Duration::from_millis(500));
        assert!(matches!(result, Err(DeviceError::Unreachable(_))));
    }
}
