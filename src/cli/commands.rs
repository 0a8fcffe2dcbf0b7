use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "vigil",
    version,
    about = "Streaming dashboard client for a repository vulnerability-scan backend"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Submit a repository and stream findings until the scan finishes
    Scan(ScanArgs),
    /// Validate a repository reference without submitting it
    Check(CheckArgs),
}

#[derive(Args, Clone)]
pub struct ScanArgs {
    /// Repository URL to scan
    #[arg(short, long)]
    pub url: String,

    /// WebSocket endpoint of the scanning backend
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Host a repository reference must point at
    #[arg(long)]
    pub expected_host: Option<String>,

    /// Print the final session snapshot as JSON
    #[arg(long)]
    pub json: bool,

    /// Skip the file tree in the final report
    #[arg(long)]
    pub no_tree: bool,
}

#[derive(Args, Clone)]
pub struct CheckArgs {
    /// Repository URL to validate
    pub url: String,

    /// Host a repository reference must point at
    #[arg(long)]
    pub expected_host: Option<String>,
}
