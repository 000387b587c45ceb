//! Device access layer
//!
//! Provides a trait-based abstraction over the miner HTTP API for testability.

pub mod http;
pub mod traits;

pub use http::HttpDeviceClient;
pub use traits::DeviceClient;
