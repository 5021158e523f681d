//! Pluggable report delivery and error rendering.
//!
//! # Design Decisions
//! - Two narrow traits, one method each, injected per handler instance
//! - Defaults only log, so they hold no request-scoped state
//! - Closures implement both traits for ad-hoc hooks

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::error::{ReportError, SinkError};
use super::types::{Disposition, ViolationReport};

/// Receives every successfully decoded violation report.
pub trait ReportSink: Send + Sync {
    fn report(&self, report: ViolationReport) -> Result<(), SinkError>;
}

/// Renders every ingestion failure into a response.
pub trait ErrorHandler: Send + Sync {
    fn handle_error(&self, status: StatusCode, error: &ReportError) -> Response;
}

impl<F> ReportSink for F
where
    F: Fn(ViolationReport) -> Result<(), SinkError> + Send + Sync,
{
    fn report(&self, report: ViolationReport) -> Result<(), SinkError> {
        self(report)
    }
}

impl<F> ErrorHandler for F
where
    F: Fn(StatusCode, &ReportError) -> Response + Send + Sync,
{
    fn handle_error(&self, status: StatusCode, error: &ReportError) -> Response {
        self(status, error)
    }
}

/// Default sink: logs each report.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReportSink;

impl ReportSink for LogReportSink {
    fn report(&self, report: ViolationReport) -> Result<(), SinkError> {
        tracing::info!(
            document_uri = %report.document_uri,
            blocked_uri = %report.blocked_uri,
            effective_directive = %report.effective_directive,
            violated_directive = %report.violated_directive,
            disposition = report.disposition.as_ref().map(Disposition::as_str),
            status = report.status_code,
            "CSP violation reported"
        );
        Ok(())
    }
}

/// Default error handler: logs the error and answers with its message.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogErrorHandler;

impl ErrorHandler for LogErrorHandler {
    fn handle_error(&self, status: StatusCode, error: &ReportError) -> Response {
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %error, "CSP report handling failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %error, "CSP report rejected");
        }
        (status, error.to_string()).into_response()
    }
}
