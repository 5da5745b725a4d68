//! Error types for computation-tree evaluation

use crate::config::ConfigError;
use thiserror::Error;
use tracelink_domain::DomainError;

/// Errors that can occur while building or evaluating a computation tree
#[derive(Error, Debug)]
pub enum EngineError {
    /// Invalid domain value (e.g. a confidence out of range)
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Threshold limit outside of [0, 1]
    #[error("Invalid threshold {0}: must be a finite number in [0, 1]")]
    InvalidThreshold(f64),

    /// Weight vector does not match the number of children
    #[error("Weight mismatch: {actual} weights for {expected} children")]
    WeightMismatch {
        /// Number of children
        expected: usize,
        /// Number of weights
        actual: usize,
    },

    /// A weight below zero (or not a finite number)
    #[error("Negative weight {weight} at index {index}")]
    NegativeWeight {
        /// Position in the weight vector
        index: usize,
        /// Offending weight
        weight: f64,
    },

    /// An aggregation node without children
    #[error("Combinator {combinator} requires at least one child")]
    NoChildren {
        /// Description of the combinator
        combinator: String,
    },

    /// Accessed the single child of a node that has zero or several
    #[error("Node {node} has {count} children, expected exactly one")]
    NotExactlyOneChild {
        /// Description of the node
        node: String,
        /// Actual number of children
        count: usize,
    },

    /// A child result lacks an entry for a tuple of the repo
    #[error("Child {child} of {node} has no confidence for tuple {tuple}")]
    IncompleteChildResult {
        /// Description of the aggregating node
        node: String,
        /// Description of the incomplete child
        child: String,
        /// The missing tuple
        tuple: String,
    },

    /// A child was not evaluated before its parent
    #[error("Child {child} of {node} has not been computed")]
    MissingChildResult {
        /// Description of the parent node
        node: String,
        /// Description of the child node
        child: String,
    },

    /// The run was cancelled through its cancellation token
    #[error("Computation cancelled")]
    Cancelled,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
