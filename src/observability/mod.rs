//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! policy middleware, report handler, server:
//!     → tracing events (logging.rs installs the subscriber)
//!     → metrics.rs (report and rejection counters)
//!
//! Consumers:
//!     → stdout log stream
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Structured fields on every event, never preformatted messages
//! - Metric updates are no-ops until a recorder is installed, so library
//!   users and tests pay nothing

pub mod logging;
pub mod metrics;
