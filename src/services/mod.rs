//! Periodic background services
//!
//! Each service owns one loop: collecting telemetry, evaluating alerts,
//! rotating logs and restarting devices. The scheduler wires them to the
//! configuration and runs them on threads.

pub mod alert_service;
pub mod collector;
pub mod restart;
pub mod rotation;
pub mod scheduler;

pub use alert_service::AlertService;
pub use collector::{Collector, CycleSummary};
pub use restart::RestartService;
pub use rotation::Rotation;
pub use scheduler::Scheduler;
