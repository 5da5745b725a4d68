//! Elementwise confidence aggregation
//!
//! A [`ConfidenceAggregator`] combines its children tuple by tuple: for
//! every tuple of the repo it gathers one confidence per child and reduces
//! them to a single confidence.

use crate::{EngineError, EvaluationContext, Node, NodeResult};
use std::fmt;
use std::hash::{Hash, Hasher};
use tracelink_domain::Confidence;

/// What an average yields when its weighted numerator is exactly zero
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ZeroNumerator {
    /// Absent, even if some children confirmed a score of 0
    #[default]
    Absent,

    /// `0` if at least one child is present; absent only when every
    /// child is absent or all weights are zero
    Zero,
}

/// Per-tuple reduction over the children's confidences
#[derive(Debug, Clone, PartialEq)]
pub enum ConfidenceAggregator {
    /// Weighted mean of the present values over the sum of all weights
    Average {
        /// One weight per child; `None` weighs every child with 1
        weights: Option<Vec<f64>>,
        /// Handling of a zero numerator
        zero_numerator: ZeroNumerator,
    },

    /// Largest confidence
    Maximum,

    /// Largest confidence if it reaches `limit`, absent otherwise
    Threshold {
        /// Inclusive lower limit in [0, 1]
        limit: f64,
    },
}

impl ConfidenceAggregator {
    /// Unweighted average
    pub fn average() -> Self {
        ConfidenceAggregator::Average {
            weights: None,
            zero_numerator: ZeroNumerator::default(),
        }
    }

    /// Weighted average
    ///
    /// Weights are scaled so the largest is 1; only their ratios matter,
    /// and the scaled sums cannot overflow.
    ///
    /// # Errors
    /// [`EngineError::NegativeWeight`] for a weight below zero or not
    /// finite. The weight count is checked against the children when the
    /// node is built.
    pub fn weighted_average(weights: Vec<f64>) -> Result<Self, EngineError> {
        for (index, &weight) in weights.iter().enumerate() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(EngineError::NegativeWeight { index, weight });
            }
        }
        let largest = weights.iter().copied().fold(0.0, f64::max);
        let weights = if largest > 0.0 {
            weights.into_iter().map(|weight| weight / largest).collect()
        } else {
            weights
        };
        Ok(ConfidenceAggregator::Average {
            weights: Some(weights),
            zero_numerator: ZeroNumerator::default(),
        })
    }

    /// Maximum
    pub fn maximum() -> Self {
        ConfidenceAggregator::Maximum
    }

    /// Threshold at `limit`
    ///
    /// # Errors
    /// [`EngineError::InvalidThreshold`] if `limit` is not in [0, 1].
    pub fn threshold(limit: f64) -> Result<Self, EngineError> {
        if !(0.0..=1.0).contains(&limit) {
            return Err(EngineError::InvalidThreshold(limit));
        }
        Ok(ConfidenceAggregator::Threshold { limit })
    }

    /// Set the zero-numerator policy of an average; other variants are
    /// returned unchanged
    pub fn with_zero_numerator(self, policy: ZeroNumerator) -> Self {
        match self {
            ConfidenceAggregator::Average { weights, .. } => ConfidenceAggregator::Average {
                weights,
                zero_numerator: policy,
            },
            other => other,
        }
    }

    /// Check the aggregator against the number of children of its node
    pub fn validate_children(&self, children: usize) -> Result<(), EngineError> {
        if let ConfidenceAggregator::Average {
            weights: Some(weights),
            ..
        } = self
        {
            if weights.len() != children {
                return Err(EngineError::WeightMismatch {
                    expected: children,
                    actual: weights.len(),
                });
            }
        }
        Ok(())
    }

    /// Reduce one confidence per child to the node's confidence
    pub fn reduce(&self, confidences: &[Confidence]) -> Result<Confidence, EngineError> {
        match self {
            ConfidenceAggregator::Average {
                weights,
                zero_numerator,
            } => {
                self.validate_children(confidences.len())?;
                average(confidences, weights.as_deref(), *zero_numerator)
            }
            ConfidenceAggregator::Maximum => Ok(maximum(confidences)),
            ConfidenceAggregator::Threshold { limit } => {
                let max = maximum(confidences);
                match max.as_option() {
                    Some(value) if value >= *limit => Ok(max),
                    _ => Ok(Confidence::absent()),
                }
            }
        }
    }

    /// Evaluate the node over every tuple of the repo
    pub(crate) fn calculate(
        &self,
        node: &Node,
        ctx: &EvaluationContext<'_>,
        children: &[&NodeResult],
    ) -> Result<NodeResult, EngineError> {
        let entries = ctx.try_map(ctx.repo.tuples(), |tuple| {
            let confidences = children
                .iter()
                .zip(node.children())
                .map(|(result, child)| {
                    result
                        .confidence_of(tuple)
                        .ok_or_else(|| EngineError::IncompleteChildResult {
                            node: node.description(),
                            child: child.description(),
                            tuple: tuple.to_string(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok((tuple.clone(), self.reduce(&confidences)?))
        })?;

        Ok(entries.into_iter().collect())
    }
}

fn maximum(confidences: &[Confidence]) -> Confidence {
    confidences.iter().copied().max().unwrap_or_default()
}

fn average(
    confidences: &[Confidence],
    weights: Option<&[f64]>,
    zero_numerator: ZeroNumerator,
) -> Result<Confidence, EngineError> {
    let weight_at = |index: usize| weights.map_or(1.0, |w| w[index]);

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    let mut any_present = false;
    for (index, confidence) in confidences.iter().enumerate() {
        let weight = weight_at(index);
        denominator += weight;
        if let Some(value) = confidence.as_option() {
            numerator += weight * value;
            any_present = true;
        }
    }

    if numerator == 0.0 {
        return match zero_numerator {
            ZeroNumerator::Zero if any_present && denominator > 0.0 => Ok(Confidence::of(0.0)?),
            _ => Ok(Confidence::absent()),
        };
    }
    Ok(Confidence::of(numerator / denominator)?)
}

impl Eq for ConfidenceAggregator {}

// Weights and limits are validated finite numbers; -0.0 is folded into 0.0
// so hashing bits agrees with equality
impl Hash for ConfidenceAggregator {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            ConfidenceAggregator::Average {
                weights,
                zero_numerator,
            } => {
                weights
                    .as_ref()
                    .map(|w| w.iter().map(|x| (x + 0.0).to_bits()).collect::<Vec<_>>())
                    .hash(state);
                zero_numerator.hash(state);
            }
            ConfidenceAggregator::Maximum => {}
            ConfidenceAggregator::Threshold { limit } => (limit + 0.0).to_bits().hash(state),
        }
    }
}

impl fmt::Display for ConfidenceAggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfidenceAggregator::Average { weights: None, .. } => write!(f, "Average"),
            ConfidenceAggregator::Average {
                weights: Some(weights),
                ..
            } => {
                let weights: Vec<String> = weights.iter().map(|w| w.to_string()).collect();
                write!(f, "Average[{}]", weights.join(", "))
            }
            ConfidenceAggregator::Maximum => write!(f, "Maximum"),
            ConfidenceAggregator::Threshold { limit } => write!(f, "Threshold({})", limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::conf;

    fn absent() -> Confidence {
        Confidence::absent()
    }

    #[test]
    fn test_average_absent_counts_in_denominator() {
        let avg = ConfidenceAggregator::weighted_average(vec![1.0, 1.0]).unwrap();
        let value = avg.reduce(&[conf(0.8), conf(0.4)]).unwrap().value().unwrap();
        assert!((value - 0.6).abs() < 1e-12);
        assert_eq!(avg.reduce(&[absent(), conf(0.2)]).unwrap(), conf(0.1));
    }

    #[test]
    fn test_average_weights() {
        let avg = ConfidenceAggregator::weighted_average(vec![3.0, 1.0]).unwrap();
        let value = avg.reduce(&[conf(1.0), conf(0.0)]).unwrap().value().unwrap();
        assert!((value - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_huge_weights_do_not_overflow() {
        let avg = ConfidenceAggregator::weighted_average(vec![f64::MAX, f64::MAX]).unwrap();
        assert_eq!(avg.reduce(&[conf(0.5), conf(0.5)]).unwrap(), conf(0.5));
        assert_eq!(avg.reduce(&[conf(1.0), conf(1.0)]).unwrap(), conf(1.0));
        assert_eq!(avg.reduce(&[conf(1.0), absent()]).unwrap(), conf(0.5));
    }

    #[test]
    fn test_weights_compare_by_ratio() {
        assert_eq!(
            ConfidenceAggregator::weighted_average(vec![2.0, 4.0]).unwrap(),
            ConfidenceAggregator::weighted_average(vec![0.5, 1.0]).unwrap()
        );
    }

    #[test]
    fn test_unweighted_average() {
        let avg = ConfidenceAggregator::average();
        assert_eq!(avg.reduce(&[conf(0.5), conf(1.0), absent(), conf(0.5)]).unwrap(), conf(0.5));
    }

    #[test]
    fn test_average_zero_numerator_is_absent_by_default() {
        let avg = ConfidenceAggregator::average();
        assert_eq!(avg.reduce(&[conf(0.0), conf(0.0)]).unwrap(), absent());
        assert_eq!(avg.reduce(&[absent(), absent()]).unwrap(), absent());
    }

    #[test]
    fn test_average_zero_numerator_policy_zero() {
        let avg = ConfidenceAggregator::average().with_zero_numerator(ZeroNumerator::Zero);
        assert_eq!(avg.reduce(&[conf(0.0), absent()]).unwrap(), conf(0.0));
        assert_eq!(avg.reduce(&[absent(), absent()]).unwrap(), absent());

        let zero_weights = ConfidenceAggregator::weighted_average(vec![0.0, 0.0])
            .unwrap()
            .with_zero_numerator(ZeroNumerator::Zero);
        assert_eq!(zero_weights.reduce(&[conf(0.5), conf(0.5)]).unwrap(), absent());
    }

    #[test]
    fn test_negative_weight_rejected() {
        let result = ConfidenceAggregator::weighted_average(vec![1.0, -0.5]);
        assert!(matches!(result, Err(EngineError::NegativeWeight { index: 1, .. })));
        assert!(ConfidenceAggregator::weighted_average(vec![f64::NAN]).is_err());
    }

    #[test]
    fn test_weight_count_checked_against_children() {
        let avg = ConfidenceAggregator::weighted_average(vec![1.0, 2.0]).unwrap();
        assert!(avg.validate_children(2).is_ok());
        assert!(matches!(
            avg.validate_children(3),
            Err(EngineError::WeightMismatch { expected: 3, actual: 2 })
        ));
        assert!(ConfidenceAggregator::average().validate_children(5).is_ok());
    }

    #[test]
    fn test_maximum() {
        let max = ConfidenceAggregator::maximum();
        assert_eq!(max.reduce(&[conf(0.2), absent(), conf(0.7)]).unwrap(), conf(0.7));
        assert_eq!(max.reduce(&[absent(), absent()]).unwrap(), absent());
    }

    #[test]
    fn test_threshold_boundary_is_kept() {
        let threshold = ConfidenceAggregator::threshold(0.5).unwrap();
        assert_eq!(threshold.reduce(&[conf(0.5)]).unwrap(), conf(0.5));
        assert_eq!(threshold.reduce(&[conf(0.49), conf(0.3)]).unwrap(), absent());
        assert_eq!(threshold.reduce(&[conf(0.3), conf(0.9)]).unwrap(), conf(0.9));
        assert_eq!(threshold.reduce(&[absent()]).unwrap(), absent());
    }

    #[test]
    fn test_threshold_zero_keeps_every_value() {
        let threshold = ConfidenceAggregator::threshold(0.0).unwrap();
        assert_eq!(threshold.reduce(&[conf(0.0)]).unwrap(), conf(0.0));
        assert_eq!(threshold.reduce(&[absent()]).unwrap(), absent());
    }

    #[test]
    fn test_invalid_threshold() {
        assert!(matches!(
            ConfidenceAggregator::threshold(1.5),
            Err(EngineError::InvalidThreshold(_))
        ));
        assert!(ConfidenceAggregator::threshold(-0.1).is_err());
        assert!(ConfidenceAggregator::threshold(f64::NAN).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(ConfidenceAggregator::average().to_string(), "Average");
        assert_eq!(
            ConfidenceAggregator::weighted_average(vec![1.0, 0.5]).unwrap().to_string(),
            "Average[1, 0.5]"
        );
        assert_eq!(ConfidenceAggregator::maximum().to_string(), "Maximum");
        assert_eq!(ConfidenceAggregator::threshold(0.5).unwrap().to_string(), "Threshold(0.5)");
    }

    #[test]
    fn test_equal_parameters_compare_equal() {
        assert_eq!(
            ConfidenceAggregator::threshold(0.3).unwrap(),
            ConfidenceAggregator::threshold(0.3).unwrap()
        );
        assert_ne!(ConfidenceAggregator::average(), ConfidenceAggregator::maximum());
    }
}
