//! Telemetry persistence
//!
//! The append-only log is the only durable state: the collector writes it,
//! rotation truncates it, and every report is rebuilt from it.

pub mod line;
pub mod pool;
pub mod reader;
pub mod writer;

pub use line::LogRecord;
pub use pool::pool_status;
pub use reader::{
    parse_all, DeviceAggregate, DeviceTimeSeries, LatestReading, LogReport, SessionBestSample,
    NO_DURATION,
};
pub use writer::LogWriter;
