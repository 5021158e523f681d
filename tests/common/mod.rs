//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use csp_guard::config::CollectorConfig;
use csp_guard::http::CollectorServer;
use csp_guard::report::{ReportHandler, SinkError, ViolationReport};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};

pub type Recorded = Arc<Mutex<Vec<ViolationReport>>>;

/// A running collector bound to an ephemeral port.
pub struct TestCollector {
    pub addr: SocketAddr,
    pub reports: Recorded,
    pub config_tx: mpsc::UnboundedSender<CollectorConfig>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestCollector {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestCollector {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Start a collector whose sink records every report.
pub async fn start_collector(config: CollectorConfig) -> TestCollector {
    let reports: Recorded = Arc::default();
    let recorded = reports.clone();
    let handler = ReportHandler::with_sink(move |report: ViolationReport| -> Result<(), SinkError> {
        recorded.lock().unwrap().push(report);
        Ok(())
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (config_tx, config_rx) = mpsc::unbounded_channel();
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let server = CollectorServer::with_handler(config, handler);
    tokio::spawn(async move {
        let _ = server
            .run(listener, config_rx, async {
                let _ = shutdown_rx.await;
            })
            .await;
    });

    TestCollector {
        addr,
        reports,
        config_tx,
        shutdown_tx: Some(shutdown_tx),
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
