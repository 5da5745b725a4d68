//! Domain error types

use thiserror::Error;

/// Errors raised by domain value objects
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum DomainError {
    /// A confidence value outside of [0, 1] (or not a finite number)
    #[error("Invalid confidence value {0}: must be a finite number in [0, 1]")]
    InvalidValue(f64),

    /// Tried to unwrap the value of an absent confidence
    #[error("Confidence has no value")]
    NoValue,
}
