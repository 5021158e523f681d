//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the report route
//! - Wire up middleware (policy header, limits, timeout, request ID, tracing)
//! - Bind server to listener
//! - Apply policy updates from the config watcher

use std::future::Future;
use std::time::Duration;

use axum::{middleware, routing::post, Router};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::CollectorConfig;
use crate::http::middleware::{csp_middleware, PolicyHeader};
use crate::http::request::MakeRequestUuidV4;
use crate::report::{ingest_report, ReportHandler};

/// Standalone CSP report collector.
pub struct CollectorServer {
    router: Router,
    config: CollectorConfig,
    policy: PolicyHeader,
}

impl CollectorServer {
    /// Create a collector that logs every report.
    pub fn new(config: CollectorConfig) -> Self {
        Self::with_handler(config, ReportHandler::default())
    }

    /// Create a collector delivering reports through `handler`.
    pub fn with_handler(config: CollectorConfig, handler: ReportHandler) -> Self {
        let policy = PolicyHeader::new(&config.policy);
        let router = Self::build_router(&config, handler, policy.clone());
        Self {
            router,
            config,
            policy,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &CollectorConfig, handler: ReportHandler, policy: PolicyHeader) -> Router {
        Router::new()
            .route(&config.report.path, post(ingest_report))
            .with_state(handler)
            .layer(RequestBodyLimitLayer::new(config.limits.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            // Outside limit and timeout so their rejections carry the header too.
            .layer(middleware::from_fn_with_state(policy, csp_middleware))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// Run the server until `shutdown` resolves.
    ///
    /// Policies from `config_updates` replace the live policy header; other
    /// settings require a restart.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<CollectorConfig>,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            report_path = %self.config.report.path,
            "HTTP server starting"
        );

        let policy = self.policy.clone();
        let report_path = self.config.report.path.clone();
        tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                if config.report.path != report_path {
                    tracing::warn!(
                        current = %report_path,
                        requested = %config.report.path,
                        "Report path changes require a restart"
                    );
                }
                policy.update(&config.policy);
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Handle for replacing the live policy.
    pub fn policy(&self) -> PolicyHeader {
        self.policy.clone()
    }

    /// The fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }
}

/// Wait for Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{Policy, SourceList, HEADER_POLICY, REPORT_CONTENT_TYPE};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    fn post(uri: &str, content_type: &str, body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_report_route() {
        let server = CollectorServer::new(CollectorConfig::default());
        let response = server
            .router()
            .oneshot(post("/csp-report", REPORT_CONTENT_TYPE, r#"{"csp-report":{}}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("x-request-id").is_some());
        assert_eq!(
            response.headers().get(HEADER_POLICY).unwrap(),
            Policy::baseline().encode().unwrap().as_str()
        );
    }

    #[tokio::test]
    async fn test_rejections_carry_policy_header() {
        let server = CollectorServer::new(CollectorConfig::default());
        let response = server
            .router()
            .oneshot(post("/csp-report", "application/json", "{}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(response.headers().get(HEADER_POLICY).is_some());
    }

    #[tokio::test]
    async fn test_request_id_is_propagated() {
        let server = CollectorServer::new(CollectorConfig::default());
        let mut request = post("/csp-report", REPORT_CONTENT_TYPE, r#"{"csp-report":{}}"#);
        request.headers_mut().insert("x-request-id", "abc-123".parse().unwrap());

        let response = server.router().oneshot(request).await.unwrap();
        assert_eq!(response.headers().get("x-request-id").unwrap(), "abc-123");
    }

    #[tokio::test]
    async fn test_body_limit() {
        let mut config = CollectorConfig::default();
        config.limits.max_body_size = 8;
        let server = CollectorServer::new(config);

        let body = r#"{"csp-report":{}}"#;
        let mut request = post("/csp-report", REPORT_CONTENT_TYPE, body);
        request.headers_mut().insert(header::CONTENT_LENGTH, body.len().into());

        let response = server.router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            response.headers().get(HEADER_POLICY).unwrap(),
            Policy::baseline().encode().unwrap().as_str()
        );
    }

    #[tokio::test]
    async fn test_only_post_is_routed() {
        let server = CollectorServer::new(CollectorConfig::default());
        let request = Request::builder().uri("/csp-report").body(Body::empty()).unwrap();
        let response = server.router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_policy_handle_updates_router() {
        let server = CollectorServer::new(CollectorConfig::default());
        server.policy().update(&Policy {
            default_src: SourceList::new(["'self'"]),
            ..Policy::default()
        });

        let response = server
            .router()
            .oneshot(post("/csp-report", REPORT_CONTENT_TYPE, r#"{"csp-report":{}}"#))
            .await
            .unwrap();
        assert_eq!(response.headers().get(HEADER_POLICY).unwrap(), "default-src 'self'");
    }
}
