use console::style;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::cli::commands::ScanArgs;
use crate::client::ScanClient;
use crate::config::ClientConfig;
use crate::errors::VigilError;
use crate::render::{self, ScanProgress};
use crate::session::Phase;

pub async fn handle_scan(args: ScanArgs) -> Result<(), VigilError> {
    let mut config = ClientConfig::load();
    if let Some(endpoint) = args.endpoint.clone() {
        config.endpoint = endpoint;
    }
    if let Some(host) = args.expected_host.clone() {
        config.expected_host = host;
    }

    info!(url = %args.url, endpoint = %config.endpoint, "starting scan");

    let mut client = ScanClient::connect(&config).await?;
    client.submit(&args.url).await?;

    let label = client.snapshot().label.unwrap_or_else(|| args.url.clone());
    let mut progress = (!args.json).then(|| ScanProgress::new(&label));

    // Ctrl-C closes the connection; in-flight state is simply discarded.
    let cancel = CancellationToken::new();
    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c_cancel.cancel();
        }
    });

    let cancelled = loop {
        tokio::select! {
            event = client.next_event() => {
                match event {
                    Some(event) => {
                        let snapshot = client.snapshot();
                        if let Some(ref mut progress) = progress {
                            progress.handle_event(&event, &snapshot);
                        }
                        if snapshot.phase.is_terminal() {
                            break false;
                        }
                    }
                    // Stream exhausted; the session already recorded why.
                    None => break false,
                }
            }
            _ = cancel.cancelled() => break true,
        }
    };

    let snapshot = client.snapshot();
    client.close().await;

    if cancelled {
        println!("\n  {} scan cancelled", style("!").yellow());
        return Ok(());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", render::render_findings(&snapshot.findings));
        if !args.no_tree && !snapshot.tree.is_empty() {
            println!("\n{}", style(format!("{}:", label)).white().bold());
            print!("{}", render::render_tree(&snapshot.tree));
        }
    }

    info!(
        phase = %snapshot.phase,
        findings = snapshot.findings.len(),
        percentage = snapshot.percentage,
        "scan finished"
    );

    if snapshot.phase == Phase::Failed {
        return Err(VigilError::ScanFailed(
            snapshot.error.unwrap_or_else(|| "backend reported no reason".to_string()),
        ));
    }
    Ok(())
}
