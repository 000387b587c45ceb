//! Report command implementation

use crate::cli::output::{print_output, ReportSummary};
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::error::Result;
use crate::telemetry::parse_all;

/// Execute the report command
pub fn run_report(config: &Config, format: OutputFormat) -> Result<()> {
    let report = parse_all(&config.general.log_file);
    log::debug!(
        "Replayed {} with {} device(s)",
        config.general.log_file.display(),
        report.devices.len()
    );
    print_output(&ReportSummary::from(&report), format)?;
    Ok(())
}
