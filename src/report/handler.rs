//! Violation report ingestion.
//!
//! # Request Flow
//! ```text
//! POST report
//!     → Content-Type == application/csp-report   else 415
//!     → read body                                 else 400
//!     → decode {"csp-report": {...}}              else 400
//!     → ReportSink::report                        else 500
//!     → 200, empty body
//! ```
//! Every failure is answered by the injected [`ErrorHandler`].

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
};

use super::error::ReportError;
use super::sink::{ErrorHandler, LogErrorHandler, LogReportSink, ReportSink};
use super::types::{Disposition, ReportEnvelope};
use crate::observability::metrics;
use crate::policy::REPORT_CONTENT_TYPE;

/// Ingests CSP violation reports.
///
/// Cheap to clone; clones share the same hooks.
#[derive(Clone)]
pub struct ReportHandler {
    sink: Arc<dyn ReportSink>,
    error_handler: Arc<dyn ErrorHandler>,
}

impl ReportHandler {
    /// Create a handler with explicit report and error hooks.
    pub fn new(sink: impl ReportSink + 'static, error_handler: impl ErrorHandler + 'static) -> Self {
        Self {
            sink: Arc::new(sink),
            error_handler: Arc::new(error_handler),
        }
    }

    /// Create a handler with a custom sink and the logging error handler.
    pub fn with_sink(sink: impl ReportSink + 'static) -> Self {
        Self::new(sink, LogErrorHandler)
    }

    /// Replace the error handler.
    pub fn error_handler(mut self, error_handler: impl ErrorHandler + 'static) -> Self {
        self.error_handler = Arc::new(error_handler);
        self
    }

    /// Handle one report request.
    pub async fn handle(&self, request: Request<Body>) -> Response {
        match self.ingest(request).await {
            Ok(()) => StatusCode::OK.into_response(),
            Err(err) => {
                let status = err.status();
                metrics::record_rejection(status.as_u16());
                self.error_handler.handle_error(status, &err)
            }
        }
    }

    async fn ingest(&self, request: Request<Body>) -> Result<(), ReportError> {
        let content_type = request
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());
        if content_type.as_deref() != Some(REPORT_CONTENT_TYPE) {
            return Err(ReportError::UnsupportedMediaType { found: content_type });
        }

        // Size limits belong to the hosting server's body limit layer.
        let body = axum::body::to_bytes(request.into_body(), usize::MAX)
            .await
            .map_err(ReportError::Body)?;

        let envelope: ReportEnvelope = serde_json::from_slice(&body)?;
        let disposition = envelope.report.disposition.as_ref().map_or("unknown", Disposition::label);

        self.sink.report(envelope.report).map_err(ReportError::Sink)?;

        metrics::record_report(disposition);
        Ok(())
    }
}

impl Default for ReportHandler {
    fn default() -> Self {
        Self::new(LogReportSink, LogErrorHandler)
    }
}

impl std::fmt::Debug for ReportHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportHandler").finish_non_exhaustive()
    }
}

/// Axum handler mounting a [`ReportHandler`] on a route.
pub async fn ingest_report(
    State(handler): State<ReportHandler>,
    request: Request<Body>,
) -> Response {
    handler.handle(request).await
}
