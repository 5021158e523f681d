//! Violation report types.

use serde::{Deserialize, Serialize};

/// Whether the violated policy was enforced or only reported.
///
/// Matched case-insensitively; any other value is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Disposition {
    Enforce,
    Report,
    Other(String),
}

impl Disposition {
    pub fn as_str(&self) -> &str {
        match self {
            Disposition::Enforce => "enforce",
            Disposition::Report => "report",
            Disposition::Other(value) => value,
        }
    }

    /// Bounded label for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Disposition::Enforce => "enforce",
            Disposition::Report => "report",
            Disposition::Other(_) => "other",
        }
    }
}

impl From<String> for Disposition {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("enforce") {
            Disposition::Enforce
        } else if value.eq_ignore_ascii_case("report") {
            Disposition::Report
        } else {
            Disposition::Other(value)
        }
    }
}

impl From<Disposition> for String {
    fn from(disposition: Disposition) -> Self {
        match disposition {
            Disposition::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

/// A CSP violation report as submitted by a browser.
///
/// Every field is optional; browsers omit keys freely, send `null` for
/// values they do not know and add keys this type does not model, which are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawReport", rename_all = "kebab-case")]
pub struct ViolationReport {
    pub document_uri: String,
    pub referrer: String,
    pub blocked_uri: String,
    pub effective_directive: String,
    pub violated_directive: String,
    pub original_policy: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disposition: Option<Disposition>,
    #[serde(rename = "status", skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

/// Report as it appears on the wire, before null and alias handling.
#[derive(Deserialize, Default)]
#[serde(default, rename_all = "kebab-case")]
struct RawReport {
    document_uri: Option<String>,
    referrer: Option<String>,
    blocked_uri: Option<String>,
    effective_directive: Option<String>,
    violated_directive: Option<String>,
    original_policy: Option<String>,
    disposition: Option<Disposition>,
    status: Option<u16>,
    status_code: Option<u16>,
}

impl From<RawReport> for ViolationReport {
    fn from(raw: RawReport) -> Self {
        Self {
            document_uri: raw.document_uri.unwrap_or_default(),
            referrer: raw.referrer.unwrap_or_default(),
            blocked_uri: raw.blocked_uri.unwrap_or_default(),
            effective_directive: raw.effective_directive.unwrap_or_default(),
            violated_directive: raw.violated_directive.unwrap_or_default(),
            original_policy: raw.original_policy.unwrap_or_default(),
            disposition: raw.disposition,
            // `status` wins when a browser sends both keys.
            status_code: raw.status.or(raw.status_code),
        }
    }
}

/// Wire envelope: `{"csp-report": {...}}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportEnvelope {
    #[serde(rename = "csp-report")]
    pub report: ViolationReport,
}
