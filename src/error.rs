//! Error types.
//!
//! Validation failures are not errors: they are reported inline on the form.
//! `SiteError` covers the things that should never happen on a well-formed
//! page and get logged by the startup guard or the runtime.

use thiserror::Error;

/// Errors raised by the document model, the runtime, or a feature.
#[derive(Debug, Error)]
pub enum SiteError {
    /// A selector string could not be parsed.
    #[error("invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },

    /// A scheduled task or listener reported a failure.
    #[error("task failed: {0}")]
    Task(String),
}

impl SiteError {
    pub(crate) fn selector(selector: &str, reason: impl Into<String>) -> Self {
        Self::Selector {
            selector: selector.to_string(),
            reason: reason.into(),
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SiteError>;
