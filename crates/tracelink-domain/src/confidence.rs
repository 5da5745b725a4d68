//! Confidence module
//!
//! A confidence is either absent ("no opinion") or a value in [0, 1].
//! Absent is a legitimate state, not an error: it simply means that a
//! heuristic or aggregation did not vote for an endpoint tuple.

use crate::DomainError;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Optional belief strength that an endpoint tuple is a trace link
///
/// Ordering: absent sorts below every value, values compare numerically.
/// Confidences are immutable and copied by value.
#[derive(Debug, Clone, Copy, Default)]
pub struct Confidence(Option<f64>);

impl Confidence {
    /// The absent confidence
    ///
    /// # Examples
    ///
    /// ```
    /// use tracelink_domain::Confidence;
    ///
    /// assert!(!Confidence::absent().has_value());
    /// ```
    pub const fn absent() -> Self {
        Self(None)
    }

    /// Create a confidence with a value
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidValue`] if `value` is not a finite
    /// number in [0, 1]. Values are never clamped.
    ///
    /// # Examples
    ///
    /// ```
    /// use tracelink_domain::Confidence;
    ///
    /// let confidence = Confidence::of(0.75).unwrap();
    /// assert_eq!(confidence.value().unwrap(), 0.75);
    /// assert!(Confidence::of(1.5).is_err());
    /// ```
    pub fn of(value: f64) -> Result<Self, DomainError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(DomainError::InvalidValue(value));
        }
        // -0.0 passes the range check; store it as +0.0 so Eq and Ord agree
        Ok(Self(Some(value + 0.0)))
    }

    /// Build a confidence from an optional raw value
    pub fn from_option(value: Option<f64>) -> Result<Self, DomainError> {
        match value {
            Some(value) => Self::of(value),
            None => Ok(Self::absent()),
        }
    }

    /// Whether this confidence carries a value
    pub fn has_value(&self) -> bool {
        self.0.is_some()
    }

    /// The carried value
    ///
    /// # Errors
    /// Returns [`DomainError::NoValue`] for an absent confidence.
    pub fn value(&self) -> Result<f64, DomainError> {
        self.0.ok_or(DomainError::NoValue)
    }

    /// The carried value as an `Option`
    pub fn as_option(&self) -> Option<f64> {
        self.0
    }
}

impl PartialEq for Confidence {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

// Values are finite and never NaN, so equality is reflexive
impl Eq for Confidence {}

impl PartialOrd for Confidence {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Confidence {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.0, other.0) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) => a.total_cmp(&b),
        }
    }
}

impl Hash for Confidence {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.map(f64::to_bits).hash(state);
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{}", value),
            None => write!(f, "absent"),
        }
    }
}

impl TryFrom<f64> for Confidence {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::of(value)
    }
}
