//! CLI argument definitions using clap derive
//!
//! Defines all command-line arguments and subcommands.

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// Bitaxe fleet telemetry daemon
///
/// Collects miner telemetry into a plain-text log, alerts on temperature and
/// new session-best records, and serves dashboard data over HTTP.
#[derive(Parser, Debug)]
#[command(name = "axemon")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "AXEMON_CONFIG")]
    pub config: Option<String>,

    /// Device address; repeat to replace the configured fleet
    #[arg(long = "device", value_name = "IP")]
    pub devices: Vec<String>,

    /// Telemetry log path
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Telegram bot token
    #[arg(long, global = true, env = "TG_TOKEN", hide_env_values = true)]
    pub tg_token: Option<String>,

    /// Telegram chat id
    #[arg(long, global = true, env = "TG_CHAT_ID")]
    pub tg_chat_id: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Default `env_logger` filter; `RUST_LOG` still takes precedence
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.is_daemon() {
            "info"
        } else {
            "warn"
        }
    }

    /// Whether this invocation runs the long-lived daemon
    pub fn is_daemon(&self) -> bool {
        matches!(self.command, Commands::Serve(_))
    }
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start every background loop and the HTTP API
    Serve(ServeArgs),

    /// Poll every device once and print the readings
    Poll,

    /// Replay the telemetry log and print per-device aggregates
    Report,

    /// Restart one configured device
    Restart {
        /// Device address as configured
        device: String,
    },

    /// Print the latest hashrate line from the pool log
    PoolStatus,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// HTTP port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Address to bind the HTTP API to
    #[arg(long)]
    pub bind: Option<String>,
}

/// Output format
#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format for machine parsing
    Json,
    /// Compact single-line format
    Compact,
}

/// Generate shell completions and print to stdout
pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}
