//! Pool status command implementation

use crate::cli::output::{print_output, PoolStatusView};
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::error::Result;
use crate::telemetry::pool_status;

/// Execute the pool-status command
pub fn run_pool_status(config: &Config, format: OutputFormat) -> Result<()> {
    let view = PoolStatusView {
        status: pool_status(&config.general.pool_log),
    };
    print_output(&view, format)?;
    Ok(())
}
