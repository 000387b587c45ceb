//! axemon - Bitaxe fleet telemetry library
//!
//! Polls a fleet of Bitaxe miners over their HTTP API, keeps an append-only
//! plain-text telemetry log, raises temperature and session-best alerts, and
//! serves aggregates rebuilt from the log over HTTP.
//!
//! # Modules
//!
//! - [`alerts`]: Alert engine and notification channels
//! - [`api`]: HTTP API
//! - [`cli`]: Command-line interface definitions
//! - [`commands`]: Command handlers
//! - [`config`]: Configuration system
//! - [`device`]: Miner HTTP client abstraction
//! - [`domain`]: Device readings and value parsing
//! - [`error`]: Error types
//! - [`services`]: Background loops
//! - [`telemetry`]: Log writer, reader and pool status

pub mod alerts;
pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod device;
pub mod domain;
pub mod error;
pub mod services;
pub mod telemetry;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::{AppError, Result};
