//! Errors raised while setting up a simulation run.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Fails with [`DomainError::InvalidConfiguration`] unless `value` is finite and strictly positive.
pub(crate) fn ensure_positive(name: &str, value: f64) -> Result<f64, DomainError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(DomainError::InvalidConfiguration(format!(
            "{name} must be positive, got {value}"
        )))
    }
}
