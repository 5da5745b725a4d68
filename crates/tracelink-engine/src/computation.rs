//! Computation driver
//!
//! Builds the endpoint tuple repo for a model pair, evaluates the tree
//! bottom-up into a [`ComputationResult`] and extracts the root's trace
//! links.

use crate::{
    CancellationToken, ComputationResult, EngineConfig, EngineError, EvaluationContext, NodeRef,
};
use std::collections::BTreeSet;
use tracelink_domain::{ArchitectureModel, CodeModel, EndpointTupleRepo, TraceLink};
use tracing::{debug, info};

/// One evaluation of a computation tree
///
/// # Examples
///
/// ```
/// use tracelink_domain::{
///     ArchitectureEndpoint, CodeEndpoint, Confidence, InMemoryArchitectureModel,
///     InMemoryCodeModel,
/// };
/// use tracelink_engine::{Computation, ConfidenceTable, Node};
///
/// let architecture =
///     InMemoryArchitectureModel::new([ArchitectureEndpoint::component("a1", "Storage")]);
/// let code = InMemoryCodeModel::new([CodeEndpoint::new("c1", "storage.rs")]);
///
/// let names = ConfidenceTable::new("names").with("a1", "c1", Confidence::of(0.9).unwrap());
/// let root = Node::threshold(0.5, [Node::leaf(names).into_ref()]).unwrap().into_ref();
///
/// let links = Computation::run(root, &architecture, &code).unwrap();
/// assert_eq!(links.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Computation {
    root: NodeRef,
    config: EngineConfig,
    cancellation: CancellationToken,
    existing: ComputationResult,
}

impl Computation {
    /// Create a computation of the tree rooted at `root` with default settings
    pub fn new(root: NodeRef) -> Self {
        Self {
            root,
            config: EngineConfig::default(),
            cancellation: CancellationToken::new(),
            existing: ComputationResult::new(),
        }
    }

    /// Use the given evaluation settings
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Observe the given cancellation token
    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Reuse node results of an earlier run; those nodes are not recomputed
    pub fn with_existing(mut self, existing: ComputationResult) -> Self {
        self.existing = existing;
        self
    }

    /// Root of the tree
    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    /// Evaluation settings
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate the whole tree over the given models
    ///
    /// Returns the result of every computed node. Fails on the first
    /// structural error or on cancellation; no partial result is returned.
    pub fn evaluate(
        &self,
        architecture_model: &dyn ArchitectureModel,
        code_model: &dyn CodeModel,
    ) -> Result<ComputationResult, EngineError> {
        self.config.validate()?;

        let repo = EndpointTupleRepo::build(architecture_model, code_model);
        info!(
            root = %self.root,
            architecture_endpoints = repo.architecture_endpoints().len(),
            code_endpoints = repo.code_endpoints().len(),
            tuples = repo.len(),
            parallel = self.config.parallel,
            "Starting computation"
        );

        let ctx = EvaluationContext {
            architecture_model,
            code_model,
            repo: &repo,
            config: &self.config,
            cancellation: &self.cancellation,
        };
        ctx.checkpoint()?;

        let mut result = ComputationResult::new();
        result.merge_partial(self.existing.clone());
        self.root.compute(&ctx, &mut result)?;

        let trace_links = result.trace_links_for(&self.root).len();
        info!(
            root = %self.root,
            nodes = result.len(),
            trace_links,
            "Computation complete"
        );

        if self.config.explain_trace_links {
            self.explain(&result);
        }

        Ok(result)
    }

    /// Evaluate the tree and return the root's trace links
    pub fn trace_links(
        &self,
        architecture_model: &dyn ArchitectureModel,
        code_model: &dyn CodeModel,
    ) -> Result<BTreeSet<TraceLink>, EngineError> {
        let result = self.evaluate(architecture_model, code_model)?;
        Ok(result.trace_links_for(&self.root))
    }

    /// Evaluate `root` with default settings and return its trace links
    pub fn run(
        root: NodeRef,
        architecture_model: &dyn ArchitectureModel,
        code_model: &dyn CodeModel,
    ) -> Result<BTreeSet<TraceLink>, EngineError> {
        Self::new(root).trace_links(architecture_model, code_model)
    }

    fn explain(&self, result: &ComputationResult) {
        let Some(root_result) = result.result_for(&self.root) else {
            return;
        };
        for tuple in root_result.linked_tuples() {
            let chain = result.explanation_chain(&self.root, tuple);
            debug!(tuple = %tuple, chain = ?chain, "Trace link explanation");
        }
    }
}
