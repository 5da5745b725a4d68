//! Leaf heuristics
//!
//! Leaves contribute raw per-tuple confidences. The matching logic itself
//! (name resemblance, package structure, ...) lives outside this crate and
//! plugs in through [`Heuristic`]. A leaf may depend on other nodes (for
//! example a heuristic that removes links another node already found); the
//! results of those dependencies are handed to it through
//! [`HeuristicContext`].

use crate::{EngineError, EvaluationContext, NodeResult};
use std::collections::BTreeMap;
use std::fmt;
use tracelink_domain::{ArchitectureModel, CodeModel, Confidence, EndpointTuple, EndpointTupleRepo};

/// Inputs visible to a heuristic while it scores a tuple
pub struct HeuristicContext<'a> {
    /// Architecture model under analysis
    pub architecture_model: &'a dyn ArchitectureModel,
    /// Code model under analysis
    pub code_model: &'a dyn CodeModel,
    /// Cross product of both models' endpoints
    pub repo: &'a EndpointTupleRepo,
    /// Results of the leaf's dependency nodes, in declaration order
    pub dependencies: &'a [&'a NodeResult],
}

impl<'a> HeuristicContext<'a> {
    /// Result of the dependency at `index`
    pub fn dependency(&self, index: usize) -> Option<&'a NodeResult> {
        self.dependencies.get(index).copied()
    }
}

/// A leaf scoring function
pub trait Heuristic: fmt::Debug + Send + Sync {
    /// Name used in node descriptions and explanations
    fn name(&self) -> &str;

    /// Raw confidence for one tuple
    fn confidence(
        &self,
        tuple: &EndpointTuple,
        context: &HeuristicContext<'_>,
    ) -> Result<Confidence, EngineError>;
}

/// Score every tuple of the repo with `heuristic`
pub(crate) fn evaluate(
    heuristic: &dyn Heuristic,
    ctx: &EvaluationContext<'_>,
    dependencies: &[&NodeResult],
) -> Result<NodeResult, EngineError> {
    let heuristic_context = HeuristicContext {
        architecture_model: ctx.architecture_model,
        code_model: ctx.code_model,
        repo: ctx.repo,
        dependencies,
    };

    let entries = ctx.try_map(ctx.repo.tuples(), |tuple| {
        let confidence = heuristic.confidence(tuple, &heuristic_context)?;
        Ok((tuple.clone(), confidence))
    })?;

    Ok(entries.into_iter().collect())
}

/// Precomputed confidences keyed by (architecture id, code id)
///
/// Tuples not listed in the table are absent. Useful for scores produced
/// by an external matcher and for tests.
///
/// # Examples
///
/// ```
/// use tracelink_domain::Confidence;
/// use tracelink_engine::ConfidenceTable;
///
/// let table = ConfidenceTable::new("names")
///     .with("storage", "storage.rs", Confidence::of(0.9).unwrap());
/// assert_eq!(table.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfidenceTable {
    name: String,
    entries: BTreeMap<(String, String), Confidence>,
}

impl ConfidenceTable {
    /// Create an empty table
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Add an entry (builder style)
    pub fn with(
        mut self,
        architecture_id: impl Into<String>,
        code_id: impl Into<String>,
        confidence: Confidence,
    ) -> Self {
        self.insert(architecture_id, code_id, confidence);
        self
    }

    /// Add or replace an entry
    pub fn insert(
        &mut self,
        architecture_id: impl Into<String>,
        code_id: impl Into<String>,
        confidence: Confidence,
    ) {
        self.entries
            .insert((architecture_id.into(), code_id.into()), confidence);
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Heuristic for ConfidenceTable {
    fn name(&self) -> &str {
        &self.name
    }

    fn confidence(
        &self,
        tuple: &EndpointTuple,
        _context: &HeuristicContext<'_>,
    ) -> Result<Confidence, EngineError> {
        let key = (
            tuple.architecture_endpoint().id.clone(),
            tuple.code_endpoint().id.clone(),
        );
        Ok(self.entries.get(&key).copied().unwrap_or_default())
    }
}
