use std::sync::Arc;

use rpg_live_view::config::ClientConfig;
use rpg_live_view::view::TerminalView;
use rpg_live_view::ws::RealtimeViewClient;

#[tokio::main]
async fn main() {
    // Initialize tracing (structured logging).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rpg_live_view=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env();

    tracing::info!(
        "rpg-live-view v{} starting as {} against {}",
        env!("CARGO_PKG_VERSION"),
        config.role,
        config.server_url,
    );

    let client = RealtimeViewClient::new(config, Arc::new(TerminalView::stdout()));
    let handle = match client.start() {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Failed to start: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for ctrl-c: {e}");
    }
    handle.stop().await;
}
