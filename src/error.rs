//! Error types for estimation and configuration

use std::io;
use thiserror::Error;

/// Result type for filter operations
pub type EstimationResult<T> = Result<T, EstimationError>;

/// Faults raised by a single predict/update cycle.
///
/// None of these leave the belief half-updated: when an operation fails the filter keeps
/// whatever belief it had before the call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EstimationError {
    /// Negative or non-finite time step passed to predict
    #[error("Invalid time step: {0}")]
    InvalidTimeStep(f64),

    /// Innovation covariance could not be inverted
    #[error("Innovation covariance is singular, update skipped")]
    SingularInnovation,

    /// Measurement contains NaN or infinite components
    #[error("Measurement is not finite")]
    NonFiniteMeasurement,

    /// Cholesky factorisation failed on the named matrix
    #[error("{0} is not positive definite")]
    NotPositiveDefinite(&'static str),
}

impl EstimationError {
    /// A recoverable fault only costs the current tick; the caller may keep tracking.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, EstimationError::SingularInnovation)
    }
}

/// Errors from building filters, motion sources or simulations
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name} must be non-negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("Failed to read config: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Anything that stops a simulated tick
#[derive(Error, Debug)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Estimation(#[from] EstimationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_singular_innovation_is_recoverable() {
        assert!(EstimationError::SingularInnovation.is_recoverable());
        assert!(!EstimationError::InvalidTimeStep(-1.0).is_recoverable());
        assert!(!EstimationError::NonFiniteMeasurement.is_recoverable());
        assert!(!EstimationError::NotPositiveDefinite("P").is_recoverable());
    }

    #[test]
    fn config_error_names_parameter() {
        let err = ConfigError::Negative {
            name: "noise_std",
            value: -0.5,
        };
        assert_eq!(err.to_string(), "noise_std must be non-negative, got -0.5");
    }
}
