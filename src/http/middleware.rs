//! Policy header middleware.
//!
//! # Responsibilities
//! - Encode the policy once per policy change, not per response
//! - Attach `Content-Security-Policy` (or `-Report-Only`) to every response
//! - Allow the live policy to be replaced without rebuilding the router
//!
//! # Design Decisions
//! - Fail open: a policy that cannot be encoded, or that is not a legal
//!   header value, sends no header and never blocks the request
//! - A policy header set by the downstream handler is kept
//! - A policy with no directives sends no header

use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

use crate::policy::Policy;

type EncodedHeader = Option<(HeaderName, HeaderValue)>;

/// Live, pre-encoded policy header shared by the middleware.
///
/// Clones share state: an [`update`](PolicyHeader::update) through any clone
/// is seen by all of them.
#[derive(Clone, Debug)]
pub struct PolicyHeader {
    current: Arc<ArcSwap<EncodedHeader>>,
}

impl PolicyHeader {
    pub fn new(policy: &Policy) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(encode_header(policy))),
        }
    }

    /// Replace the policy sent on subsequent responses.
    pub fn update(&self, policy: &Policy) {
        self.current.store(Arc::new(encode_header(policy)));
        tracing::info!(report_only = policy.report_only, "Content-Security-Policy updated");
    }

    /// Header name and value currently sent, if any.
    pub fn current(&self) -> EncodedHeader {
        (**self.current.load()).clone()
    }
}

fn encode_header(policy: &Policy) -> EncodedHeader {
    let text = match policy.encode() {
        Ok(text) if text.is_empty() => return None,
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to encode policy, header disabled");
            return None;
        }
    };

    match HeaderValue::from_str(&text) {
        Ok(value) => Some((policy.header_name(), value)),
        Err(e) => {
            tracing::warn!(error = %e, policy = %text, "Policy is not a valid header value, header disabled");
            None
        }
    }
}

/// Middleware function attaching the policy header.
///
/// Mount with `axum::middleware::from_fn_with_state(header, csp_middleware)`.
pub async fn csp_middleware(
    State(policy): State<PolicyHeader>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    if let Some((name, value)) = policy.current() {
        response.headers_mut().entry(name).or_insert(value);
    }

    response
}
