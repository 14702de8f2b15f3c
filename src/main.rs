//! Validade - product expiration tracker
//!
//! Serves the product API and runs the daily expiration scan.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use validade::api::create_router;
use validade::notify::{LogNotifier, Notifier, SmtpNotifier};
use validade::store::{DocumentStore, ProductStore};
use validade::{config, spawn_expiry_task, AppState, Config, ExpirationScanner};

/// Main entry point for the product service.
///
/// # Startup Sequence
/// 1. Merge an optional `.env` file into the environment
/// 2. Initialize tracing subscriber for logging, then load configuration
/// 3. Open the product store
/// 4. Build the notifier and expiration scanner
/// 5. Start the daily expiration scan task
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Before tracing init so RUST_LOG can come from the file
    let dotenv = config::load_dotenv();

    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "validade=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Validade product service");
    match dotenv {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(err) if err.not_found() => debug!("No .env file found"),
        Err(err) => warn!("Ignoring .env file: {}", err),
    }

    let config = Config::from_env();
    info!(
        "Configuration loaded: port={}, store={}, scan_time={}, send_timeout={}s",
        config.server_port,
        config
            .store_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "in-memory".to_string()),
        config.scan_time.format("%H:%M"),
        config.send_timeout
    );

    let store: Arc<dyn ProductStore> = match &config.store_path {
        Some(path) => Arc::new(
            DocumentStore::open(path)
                .await
                .with_context(|| format!("failed to open product store at {}", path.display()))?,
        ),
        None => {
            warn!("STORE_PATH not set, products are kept in memory only");
            Arc::new(DocumentStore::in_memory())
        }
    };

    let notifier: Arc<dyn Notifier> = match config.mail() {
        Some(mail) => {
            info!("Expiry notices will be mailed to {} via {}", mail.to, mail.host);
            Arc::new(SmtpNotifier::new(&mail).context("invalid mail configuration")?)
        }
        None => {
            warn!("Mail not configured, expiry notices will only be logged");
            Arc::new(LogNotifier)
        }
    };

    let scanner = Arc::new(ExpirationScanner::new(
        store.clone(),
        notifier,
        config.send_timeout(),
    ));
    let scan_handle = spawn_expiry_task(scanner, config.scan_time);
    info!("Expiration scan task started");

    let app = create_router(AppState::new(store));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(scan_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the scan task and allows graceful shutdown.
async fn shutdown_signal(scan_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    scan_handle.abort();
    warn!("Expiration scan task aborted");
}
