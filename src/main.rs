//! axemon - Bitaxe fleet telemetry daemon
//!
//! Collects miner telemetry, raises alerts and serves dashboard data.

use axemon::cli::args::{generate_completions, Cli, Commands};
use axemon::commands::{
    load_config, run_poll, run_pool_status, run_report, run_restart, run_serve,
};
use axemon::error::{AppError, ConfigError, DeviceError};
use clap::Parser;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // The daemon logs its progress; one-shot commands only warn
    let mut logger = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cli.log_filter()),
    );
    if !cli.is_daemon() {
        logger.format_timestamp(None);
    }
    logger.init();

    // Run the appropriate command
    let result = run(&cli);

    if let Err(e) = result {
        log::error!("{}", e);
        print_error(&e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    match &cli.command {
        Commands::Serve(args) => run_serve(cli, args),

        Commands::Poll => run_poll(&load_config(cli)?.build()?, cli.format),

        Commands::Report => run_report(&load_config(cli)?.build()?, cli.format),

        Commands::Restart { device } => {
            run_restart(&load_config(cli)?.build()?, device, cli.format)
        }

        Commands::PoolStatus => run_pool_status(&load_config(cli)?.build()?, cli.format),

        Commands::Completions { shell } => {
            generate_completions(*shell);
            Ok(())
        }
    }
}

fn print_error(err: &AppError) {
    eprintln!("Error: {}", err);

    // Print helpful hints for common errors
    match err {
        AppError::NoDevices => {
            eprintln!();
            eprintln!("Hint: List miners under [fleet] devices in axemon.toml,");
            eprintln!("      or pass --device <IP> (repeatable).");
        }
        AppError::UnknownDevice(_) => {
            eprintln!();
            eprintln!("Hint: Only configured devices can be restarted.");
        }
        AppError::Config(ConfigError::FileNotFound(_)) => {
            eprintln!();
            eprintln!("Hint: Check the --config path or AXEMON_CONFIG.");
        }
        AppError::Device(DeviceError::Unreachable(_)) => {
            eprintln!();
            eprintln!("Hint: Check that the miner is powered and on the same network.");
        }
        _ => {}
    }
}
