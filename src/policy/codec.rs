//! Header text codec.
//!
//! # Wire Format
//! ```text
//! <directive> <token> <token>; <directive> <value>
//! ```
//! Directives are joined by `"; "` in registry order, tokens by one space,
//! with no trailing separator.
//!
//! # Design Decisions
//! - Encoding fails only for directive kinds that cannot be written; none of
//!   the current kinds can
//! - Decoding is total: malformed or unknown segments are dropped, because
//!   the input is often a header some other origin produced

use thiserror::Error;

use super::directive::{Directive, Slot, SlotMut, REGISTRY};
use super::{Policy, SourceList};

/// Errors that can occur while encoding a policy.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EncodeError {
    /// A directive value could not be written as header text.
    #[error("cannot encode {directive}: {reason}")]
    Directive { directive: Directive, reason: String },
}

/// Encode a policy into header text.
///
/// Absent directives are omitted; a policy with no present directive encodes
/// to an empty string.
pub fn encode(policy: &Policy) -> Result<String, EncodeError> {
    let mut parts = Vec::new();

    for entry in REGISTRY.iter() {
        match entry.slot(policy) {
            Slot::Sources(sources) if !sources.is_empty() => {
                parts.push(format!("{} {}", entry.directive, sources));
            }
            Slot::Scalar(value) if !value.is_empty() => {
                parts.push(format!("{} {}", entry.directive, value));
            }
            _ => {}
        }
    }

    Ok(parts.join("; "))
}

/// Decode header text into a policy.
///
/// Never fails. Segments without a value and unknown directives are
/// ignored; a directive that appears twice keeps its last value.
pub fn decode(text: &str) -> Policy {
    let mut policy = Policy::default();

    for segment in text.split(';') {
        let Some((name, rest)) = segment.trim().split_once(' ') else {
            continue;
        };
        let Ok(directive) = name.parse::<Directive>() else {
            tracing::trace!(directive = %name, "Ignoring unknown directive");
            continue;
        };

        match directive.entry().slot_mut(&mut policy) {
            SlotMut::Sources(sources) => *sources = SourceList::new(rest.split(' ')),
            SlotMut::Scalar(value) => *value = rest.trim().to_string(),
        }
    }

    policy
}
