//! Error kinds for experiment simulation and testing
//!
//! Every failure is a violated precondition: there is no external resource and
//! no transient failure mode, so nothing here is retryable.

use thiserror::Error;

/// Errors raised by the experiment procedure
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExperimentError {
    /// A size, probability, alpha or confidence level is out of range
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// A statistic was asked for over an empty sample
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// The comparison test is undefined for the given samples
    #[error("Degenerate sample: {0}")]
    DegenerateSample(String),
}

impl ExperimentError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        ExperimentError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Result type for experiment operations
pub type Result<T> = std::result::Result<T, ExperimentError>;
