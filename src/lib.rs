//! Content-Security-Policy toolkit.
//!
//! - [`policy`]: policy model and header text codec
//! - [`report`]: violation report ingestion with pluggable sinks
//! - [`http`]: policy header middleware and a standalone report collector

pub mod config;
pub mod http;
pub mod observability;
pub mod policy;
pub mod report;

pub use config::CollectorConfig;
pub use http::{csp_middleware, CollectorServer, PolicyHeader};
pub use policy::{Policy, SourceList};
pub use report::{ErrorHandler, ReportHandler, ReportSink, ViolationReport};
