use console::style;

use crate::cli::commands::CheckArgs;
use crate::config::ClientConfig;
use crate::errors::VigilError;
use crate::session::submit;

/// Offline validation: check the reference shape and show the label a scan
/// would display, without touching the backend.
pub fn handle_check(args: CheckArgs) -> Result<(), VigilError> {
    let config = ClientConfig::load();
    let host = args.expected_host.unwrap_or(config.expected_host);

    submit::validate_repository_url(&args.url, &host)?;

    println!(
        "  {} {} is a valid {} repository reference (label: {})",
        style("~").green(),
        style(&args.url).white().bold(),
        host,
        style(submit::display_label(&args.url)).cyan(),
    );
    Ok(())
}
