//! Content-Security-Policy model.
//!
//! # Data Flow
//! ```text
//! Policy (built in code or loaded from config)
//!     → codec.rs encode → header text → response header (http/middleware.rs)
//!
//! header text (from anywhere)
//!     → codec.rs decode → Policy
//! ```
//!
//! # Design Decisions
//! - One field per directive; `directive.rs` holds the ordered registry
//! - Source tokens are opaque strings, emitted verbatim
//! - The report-only flag picks the header name and is not part of the text

pub mod codec;
pub mod directive;

use std::fmt;

use axum::http::HeaderName;
use serde::{Deserialize, Serialize};

pub use codec::EncodeError;
pub use directive::{Directive, SlotKind, REGISTRY};

/// Enforcing policy header.
pub const HEADER_POLICY: &str = "Content-Security-Policy";

/// Report-only policy header.
pub const HEADER_REPORT_ONLY: &str = "Content-Security-Policy-Report-Only";

/// Media type browsers use when posting violation reports.
pub const REPORT_CONTENT_TYPE: &str = "application/csp-report";

pub const SOURCE_NONE: &str = "'none'";
pub const SOURCE_SELF: &str = "'self'";
pub const SOURCE_ANY: &str = "*";

/// Ordered list of source expressions for one directive.
///
/// Tokens are written joined by single spaces, so a token must not contain
/// whitespace or `;`. Such tokens are accepted but will not survive a
/// decode of the encoded header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceList(Vec<String>);

impl SourceList {
    pub fn new<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(sources.into_iter().map(Into::into).collect())
    }

    pub fn push(&mut self, source: impl Into<String>) {
        self.0.push(source.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl fmt::Display for SourceList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

impl<S: Into<String>> FromIterator<S> for SourceList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// A Content-Security-Policy.
///
/// `Policy::default()` is the empty policy. See [`Policy::baseline`] for the
/// recommended starting point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    // Fetch directives
    pub child_src: SourceList,
    pub connect_src: SourceList,
    pub default_src: SourceList,
    pub font_src: SourceList,
    pub frame_src: SourceList,
    pub img_src: SourceList,
    pub manifest_src: SourceList,
    pub media_src: SourceList,
    pub object_src: SourceList,
    pub script_src: SourceList,
    pub style_src: SourceList,
    pub worker_src: SourceList,

    // Reporting
    /// Reporting endpoint name; empty means absent.
    pub report_to: String,

    /// Deliver as `Content-Security-Policy-Report-Only`.
    pub report_only: bool,
}

impl Policy {
    /// Default policy: `default-src 'none'`, with `connect-src`, `img-src`,
    /// `script-src` and `style-src` allowed from `'self'`.
    pub fn baseline() -> Self {
        Self {
            default_src: SourceList::new([SOURCE_NONE]),
            connect_src: SourceList::new([SOURCE_SELF]),
            img_src: SourceList::new([SOURCE_SELF]),
            script_src: SourceList::new([SOURCE_SELF]),
            style_src: SourceList::new([SOURCE_SELF]),
            ..Self::default()
        }
    }

    /// Header this policy is delivered under.
    pub fn header_name(&self) -> HeaderName {
        if self.report_only {
            HeaderName::from_static("content-security-policy-report-only")
        } else {
            HeaderName::from_static("content-security-policy")
        }
    }

    /// Present directives in canonical order.
    pub fn directives(&self) -> impl Iterator<Item = (Directive, directive::Slot<'_>)> {
        REGISTRY
            .iter()
            .map(move |entry| (entry.directive, entry.slot(self)))
            .filter(|(_, slot)| slot.is_present())
    }

    /// Encode into header text. See [`codec::encode`].
    pub fn encode(&self) -> Result<String, EncodeError> {
        codec::encode(self)
    }

    /// Decode header text. See [`codec::decode`].
    pub fn decode(text: &str) -> Self {
        codec::decode(text)
    }
}
