//! Configuration validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: CollectorConfig → Result<(), Vec<ValidationError>>
//! - Policy tokens are checked here, at the config boundary; the codec
//!   itself accepts anything

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::CollectorConfig;
use crate::policy::directive::{Slot, REGISTRY};
use crate::policy::Policy;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid socket address for {field}: {value}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("report path must start with '/': {0}")]
    InvalidReportPath(String),

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("{directive} value {value:?} contains whitespace or ';'")]
    InvalidPolicyValue { directive: &'static str, value: String },
}

pub fn validate_config(config: &CollectorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }
    if !config.report.path.starts_with('/') {
        errors.push(ValidationError::InvalidReportPath(config.report.path.clone()));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero { field: "timeouts.request_secs" });
    }
    if config.limits.max_body_size == 0 {
        errors.push(ValidationError::Zero { field: "limits.max_body_size" });
    }
    errors.extend(validate_policy(&config.policy));

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check that every policy value survives a round trip through header text.
pub fn validate_policy(policy: &Policy) -> Vec<ValidationError> {
    let dirty = |value: &str| value.is_empty() || value.contains(|c: char| c.is_whitespace() || c == ';');
    let mut errors = Vec::new();

    for entry in REGISTRY.iter() {
        let directive = entry.directive.as_str();
        match entry.slot(policy) {
            Slot::Sources(sources) => {
                errors.extend(sources.iter().filter(|token| dirty(*token)).map(|token| {
                    ValidationError::InvalidPolicyValue {
                        directive,
                        value: token.to_string(),
                    }
                }));
            }
            Slot::Scalar(value) if !value.is_empty() && dirty(value) => {
                errors.push(ValidationError::InvalidPolicyValue {
                    directive,
                    value: value.to_string(),
                });
            }
            Slot::Scalar(_) => {}
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::SourceList;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&CollectorConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = CollectorConfig::default();
        config.listener.bind_address = "localhost".into();
        config.report.path = "csp-report".into();
        config.timeouts.request_secs = 0;
        config.limits.max_body_size = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::InvalidReportPath("csp-report".into())));
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = CollectorConfig::default();
        config.observability.metrics_address = "nowhere".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_policy_tokens() {
        let policy = Policy {
            script_src: SourceList::new(["'self'", "a.com b.com", ""]),
            style_src: SourceList::new(["'self';"]),
            report_to: "csp endpoint".into(),
            ..Policy::default()
        };
        let errors = validate_policy(&policy);
        assert_eq!(errors.len(), 4);
        assert_eq!(
            errors[0],
            ValidationError::InvalidPolicyValue {
                directive: "script-src",
                value: "a.com b.com".into(),
            }
        );

        assert!(validate_policy(&Policy::baseline()).is_empty());
    }
}
