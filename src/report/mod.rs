//! Violation report ingestion subsystem.
//!
//! # Data Flow
//! ```text
//! POST application/csp-report
//!     → handler.rs (content-type gate, body read, JSON envelope)
//!     → sink.rs ReportSink (default: log)
//!
//! Any failure:
//!     → error.rs ReportError (415 / 400 / 500)
//!     → sink.rs ErrorHandler (default: log + plain-text body)
//! ```
//!
//! # Design Decisions
//! - No state survives a request; each request is one-shot
//! - Hooks are injected per handler, never global
//! - Hook implementations must tolerate concurrent calls

pub mod error;
pub mod handler;
pub mod sink;
pub mod types;

pub use error::{ReportError, ReportErrorKind, SinkError};
pub use handler::{ingest_report, ReportHandler};
pub use sink::{ErrorHandler, LogErrorHandler, LogReportSink, ReportSink};
pub use types::{Disposition, ReportEnvelope, ViolationReport};
