//! Domain models for axemon
//!
//! Device addresses, decoded device responses, telemetry snapshots and the
//! magnitude-string conversions shared by polling and log replay.

pub mod endpoint;
pub mod magnitude;
pub mod snapshot;

pub use endpoint::DeviceEndpoint;
pub use magnitude::{format_magnitude, parse_canonical, parse_magnitude};
pub use snapshot::{ExtendedInfo, SystemInfo, TelemetrySnapshot};
