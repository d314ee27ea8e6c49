//! Proposal Inventory API
//!
//! Read-only JSON service over a politeiawww proposal catalogue. Each
//! lifecycle category (pre-vote, active, approved, rejected, abandoned) is
//! paged through in server order; proposals in voting categories come back
//! with their vote summaries.

use proposal_inventory::config::Settings;
use proposal_inventory::routes::create_router;
use proposal_inventory::state::AppState;
use proposal_inventory::{PoliteiaClient, ProposalInventory};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("🚀 Starting Proposal Inventory...");

    let settings = Settings::load()?;
    info!("📋 Configuration loaded successfully");

    let client = PoliteiaClient::new(&settings.politeia)?;
    info!(
        "🔗 Politeiawww server: {} (timeout {:?})",
        settings.politeia.base_url, settings.politeia.timeout
    );
    let inventory = ProposalInventory::new(Arc::new(client));

    // The handshake is repeated lazily on first use if the server is down now
    match inventory.version().await {
        Ok(version) => info!(
            "✅ Connected to politeiawww v{} (testnet: {})",
            version.version, version.test_net
        ),
        Err(e) => warn!("⚠️  Politeiawww not reachable yet: {}", e),
    }

    let state = Arc::new(AppState::new(inventory, settings.paging.clone()));
    let app = create_router(state, &settings);

    let addr = SocketAddr::from((settings.server.host, settings.server.port));

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📚 API Endpoints:");
    info!("   GET  /health                             - Health check");
    info!("   GET  /api/version                        - Politeiawww version and policy");
    info!("   GET  /api/categories                     - Proposal counts and read positions");
    info!("   GET  /api/categories/{{category}}/next?n=  - Next page of a category");
    info!("   GET  /api/proposals/{{token}}?version=     - Single proposal");
    info!("   GET  /api/proposals/{{token}}/comments     - Proposal comments");
    info!("");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutdown complete");
    Ok(())
}

/// Initialize tracing subscriber for structured logging.
///
/// `LOG_FORMAT=json` switches to one JSON object per line.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,proposal_inventory=debug,tower_http=debug"));
    let registry = tracing_subscriber::registry().with(env_filter);

    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        registry
            .with(fmt::layer().json().with_current_span(true).with_target(true))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .compact(),
            )
            .init();
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("📴 Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            info!("📴 Received terminate signal, initiating graceful shutdown...");
        },
    }
}
