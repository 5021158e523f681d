//! HTTP surface.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, tower layers)
//!     → request.rs (request id)
//!     → middleware.rs (policy header on the way out)
//!     → report::handler (POST report path)
//! ```

pub mod middleware;
pub mod request;
pub mod server;

pub use middleware::{csp_middleware, PolicyHeader};
pub use request::MakeRequestUuidV4;
pub use server::{shutdown_signal, CollectorServer};
