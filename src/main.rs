//! CSP report collector.
//!
//! ```text
//!     Browser                    ┌──────────────────────────────────────┐
//!     POST application/csp-report│             csp-guard                │
//!     ───────────────────────────┼─▶ http::server ─▶ report::handler ──┼─▶ ReportSink (log)
//!                                │        │                            │
//!     ◀──────────────────────────┼── http::middleware                  │
//!     Content-Security-Policy    │   (policy header on every response) │
//!                                │                                      │
//!                                │   config ─▶ watcher ─▶ live policy   │
//!                                └──────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use csp_guard::config::{load_config, watcher::ConfigWatcher, CollectorConfig};
use csp_guard::http::{shutdown_signal, CollectorServer};
use csp_guard::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "csp-guard")]
#[command(about = "Serve a Content-Security-Policy and collect its violation reports", long_about = None)]
struct Args {
    /// TOML configuration file; built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => CollectorConfig::default(),
    };

    logging::init(&config.observability.log_level);
    tracing::info!("csp-guard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        report_path = %config.report.path,
        report_only = config.policy.report_only,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Keep the watcher alive for the lifetime of the server.
    let (_watcher, config_updates) = match &args.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        None => {
            let (_, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = CollectorServer::new(config);
    server.run(listener, config_updates, shutdown_signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
