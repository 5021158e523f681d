//! Report ingestion errors.

use axum::http::StatusCode;
use thiserror::Error;

use crate::policy::REPORT_CONTENT_TYPE;

/// Error returned by a [`ReportSink`](super::ReportSink).
pub type SinkError = Box<dyn std::error::Error + Send + Sync>;

/// Coarse classification of ingestion failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportErrorKind {
    UnsupportedMediaType,
    BadRequest,
    Internal,
}

impl ReportErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            ReportErrorKind::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ReportErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ReportErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Errors that can occur while ingesting a violation report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Request content type is not the CSP report media type.
    #[error("unsupported content type {found:?} (expected {})", REPORT_CONTENT_TYPE)]
    UnsupportedMediaType { found: Option<String> },

    /// Request body could not be read.
    #[error("failed to read report body: {0}")]
    Body(#[source] axum::Error),

    /// Body is not a `{"csp-report": ...}` JSON envelope.
    #[error("malformed report: {0}")]
    Json(#[from] serde_json::Error),

    /// The report sink rejected the report.
    #[error("report sink failed: {0}")]
    Sink(#[source] SinkError),
}

impl ReportError {
    pub fn kind(&self) -> ReportErrorKind {
        match self {
            ReportError::UnsupportedMediaType { .. } => ReportErrorKind::UnsupportedMediaType,
            ReportError::Body(_) | ReportError::Json(_) => ReportErrorKind::BadRequest,
            ReportError::Sink(_) => ReportErrorKind::Internal,
        }
    }

    /// HTTP status this error is answered with.
    pub fn status(&self) -> StatusCode {
        self.kind().status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err = ReportError::UnsupportedMediaType {
            found: Some("application/json".into()),
        };
        assert_eq!(err.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(err.to_string().contains("application/csp-report"));

        let err = ReportError::from(serde_json::from_str::<u8>("nope").unwrap_err());
        assert_eq!(err.kind(), ReportErrorKind::BadRequest);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = ReportError::Sink("disk full".into());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "report sink failed: disk full");
    }
}
