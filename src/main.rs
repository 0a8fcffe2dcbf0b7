mod cli;
mod client;
mod config;
mod errors;
mod events;
mod models;
mod render;
mod session;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .init();

    if cli.no_color {
        console::set_colors_enabled(false);
    }

    let result = match cli.command {
        cli::Commands::Scan(args) => cli::scan::handle_scan(args).await,
        cli::Commands::Check(args) => cli::check::handle_check(args),
    };

    match result {
        Ok(()) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            let exit_code = match &e {
                errors::VigilError::Config(_) => 2,
                errors::VigilError::Connection(_) => 3,
                errors::VigilError::InvalidRepository(_) => 5,
                errors::VigilError::ScanFailed(_) => 6,
                _ => 1,
            };
            std::process::exit(exit_code);
        }
    }
}
