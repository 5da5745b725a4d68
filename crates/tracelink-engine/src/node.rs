//! Computation-tree nodes
//!
//! A node is either a leaf backed by a [`Heuristic`] or an aggregation of
//! child nodes under a [`Combinator`]. Trees are assembled bottom-up from
//! already built children, so they cannot contain cycles. The same child
//! may be shared by several parents through its [`NodeRef`]; it keeps a
//! single [`NodeId`] and is computed once per run.

use crate::heuristic::{self, Heuristic};
use crate::{
    ComputationResult, ConfidenceAggregator, EngineError, EvaluationContext, Matcher, NodeResult,
};
use std::fmt;
use std::sync::Arc;
use tracelink_domain::EndpointSide;
use tracing::debug;

/// Shared handle to a node
pub type NodeRef = Arc<Node>;

/// Unique identifier for a node based on UUIDv7
///
/// Assigned at construction; the key of a node's entry in
/// [`ComputationResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u128);

impl NodeId {
    /// Generate a new UUIDv7-based NodeId
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// How an aggregation node combines its children
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// Elementwise, per tuple
    Aggregator(ConfidenceAggregator),

    /// Selection, per endpoint of one side
    Matcher(Matcher),
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Combinator::Aggregator(aggregator) => write!(f, "{}", aggregator),
            Combinator::Matcher(matcher) => write!(f, "{}", matcher),
        }
    }
}

impl From<ConfidenceAggregator> for Combinator {
    fn from(aggregator: ConfidenceAggregator) -> Self {
        Combinator::Aggregator(aggregator)
    }
}

impl From<Matcher> for Combinator {
    fn from(matcher: Matcher) -> Self {
        Combinator::Matcher(matcher)
    }
}

/// What a node computes
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Raw scores from a heuristic; children are its dependencies
    Leaf(Arc<dyn Heuristic>),

    /// Combination of the children's results
    Aggregation(Combinator),
}

/// A node of the computation tree
#[derive(Debug)]
pub struct Node {
    id: NodeId,
    label: Option<String>,
    kind: NodeKind,
    children: Vec<NodeRef>,
}

impl Node {
    /// A standalone leaf
    pub fn leaf(heuristic: impl Heuristic + 'static) -> Self {
        Self::new(NodeKind::Leaf(Arc::new(heuristic)), Vec::new())
    }

    /// A leaf whose heuristic reads the results of `dependencies`
    pub fn dependent_leaf(
        heuristic: impl Heuristic + 'static,
        dependencies: impl IntoIterator<Item = NodeRef>,
    ) -> Self {
        Self::new(
            NodeKind::Leaf(Arc::new(heuristic)),
            dependencies.into_iter().collect(),
        )
    }

    /// An aggregation node
    ///
    /// # Errors
    /// [`EngineError::NoChildren`] without children, and
    /// [`EngineError::WeightMismatch`] for an average whose weight count
    /// differs from the number of children.
    pub fn aggregation(
        combinator: impl Into<Combinator>,
        children: impl IntoIterator<Item = NodeRef>,
    ) -> Result<Self, EngineError> {
        let combinator = combinator.into();
        let children: Vec<NodeRef> = children.into_iter().collect();
        if children.is_empty() {
            return Err(EngineError::NoChildren {
                combinator: combinator.to_string(),
            });
        }
        if let Combinator::Aggregator(aggregator) = &combinator {
            aggregator.validate_children(children.len())?;
        }
        Ok(Self::new(NodeKind::Aggregation(combinator), children))
    }

    /// Maximum over `children`
    pub fn maximum(children: impl IntoIterator<Item = NodeRef>) -> Result<Self, EngineError> {
        Self::aggregation(ConfidenceAggregator::maximum(), children)
    }

    /// Unweighted average over `children`
    pub fn average(children: impl IntoIterator<Item = NodeRef>) -> Result<Self, EngineError> {
        Self::aggregation(ConfidenceAggregator::average(), children)
    }

    /// Weighted average over `children`
    pub fn weighted_average(
        weights: Vec<f64>,
        children: impl IntoIterator<Item = NodeRef>,
    ) -> Result<Self, EngineError> {
        Self::aggregation(ConfidenceAggregator::weighted_average(weights)?, children)
    }

    /// Threshold at `limit` over `children`
    pub fn threshold(
        limit: f64,
        children: impl IntoIterator<Item = NodeRef>,
    ) -> Result<Self, EngineError> {
        Self::aggregation(ConfidenceAggregator::threshold(limit)?, children)
    }

    /// Keep `primary`'s links on the architecture side unless a filter explains them
    pub fn filter_architecture(
        primary: NodeRef,
        filters: impl IntoIterator<Item = NodeRef>,
    ) -> Result<Self, EngineError> {
        Self::aggregation(
            Matcher::filter_architecture(),
            std::iter::once(primary).chain(filters),
        )
    }

    /// Best match per endpoint of `side`
    pub fn match_best(side: EndpointSide, child: NodeRef) -> Result<Self, EngineError> {
        Self::aggregation(Matcher::match_best(side), [child])
    }

    /// First linking child per endpoint of `side`
    pub fn match_sequentially(
        side: EndpointSide,
        children: impl IntoIterator<Item = NodeRef>,
    ) -> Result<Self, EngineError> {
        Self::aggregation(Matcher::match_sequentially(side), children)
    }

    fn new(kind: NodeKind, children: Vec<NodeRef>) -> Self {
        Self {
            id: NodeId::new(),
            label: None,
            kind,
            children,
        }
    }

    /// Attach a human-readable label used in descriptions
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Wrap into a shareable handle
    pub fn into_ref(self) -> NodeRef {
        Arc::new(self)
    }

    /// Unique identifier
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Optional label
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Leaf or aggregation
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Child nodes in declaration order
    pub fn children(&self) -> &[NodeRef] {
        &self.children
    }

    /// The single child
    ///
    /// # Errors
    /// [`EngineError::NotExactlyOneChild`] unless there is exactly one.
    pub fn child(&self) -> Result<&NodeRef, EngineError> {
        match self.children.as_slice() {
            [child] => Ok(child),
            children => Err(EngineError::NotExactlyOneChild {
                node: self.description(),
                count: children.len(),
            }),
        }
    }

    /// Name of the function this node computes
    pub fn method_name(&self) -> String {
        match &self.kind {
            NodeKind::Leaf(heuristic) => heuristic.name().to_string(),
            NodeKind::Aggregation(combinator) => combinator.to_string(),
        }
    }

    /// Label if present, method name otherwise
    pub fn description(&self) -> String {
        self.label.clone().unwrap_or_else(|| self.method_name())
    }

    /// Compute this node and every missing descendant into `result`
    ///
    /// Children are computed before their parent. Nodes that already have
    /// an entry in `result` are not computed again.
    pub fn compute(
        &self,
        ctx: &EvaluationContext<'_>,
        result: &mut ComputationResult,
    ) -> Result<(), EngineError> {
        if result.contains(self) {
            return Ok(());
        }
        for child in &self.children {
            child.compute(ctx, result)?;
        }

        let node_result = self.calculate_confidences(ctx, result)?;
        debug!(
            node = %self.description(),
            tuples = node_result.len(),
            linked = node_result.present_count(),
            "Computed node"
        );
        result.record_result(self, node_result);
        Ok(())
    }

    /// This node's result from its children's recorded results
    pub fn calculate_confidences(
        &self,
        ctx: &EvaluationContext<'_>,
        result: &ComputationResult,
    ) -> Result<NodeResult, EngineError> {
        let children = self
            .children
            .iter()
            .map(|child| {
                result
                    .result_for(child)
                    .ok_or_else(|| EngineError::MissingChildResult {
                        node: self.description(),
                        child: child.description(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        match &self.kind {
            NodeKind::Leaf(heuristic) => heuristic::evaluate(heuristic.as_ref(), ctx, &children),
            NodeKind::Aggregation(Combinator::Aggregator(aggregator)) => {
                aggregator.calculate(self, ctx, &children)
            }
            NodeKind::Aggregation(Combinator::Matcher(matcher)) => {
                matcher.calculate(ctx, &children)
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfidenceTable;

    fn leaf(name: &str) -> NodeRef {
        Node::leaf(ConfidenceTable::new(name)).into_ref()
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Node::leaf(ConfidenceTable::new("a"));
        let b = Node::leaf(ConfidenceTable::new("a"));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_aggregation_requires_children() {
        let result = Node::maximum(Vec::new());
        assert!(matches!(result, Err(EngineError::NoChildren { .. })));
    }

    #[test]
    fn test_weight_mismatch() {
        let result = Node::weighted_average(vec![1.0], [leaf("a"), leaf("b")]);
        assert!(matches!(
            result,
            Err(EngineError::WeightMismatch { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_invalid_threshold_node() {
        let result = Node::threshold(2.0, [leaf("a")]);
        assert!(matches!(result, Err(EngineError::InvalidThreshold(_))));
    }

    #[test]
    fn test_description_prefers_label() {
        let node = Node::match_best(EndpointSide::Code, leaf("names")).unwrap();
        assert_eq!(node.description(), "MatchBest(code)");

        let node = node.with_label("compNameBest");
        assert_eq!(node.description(), "compNameBest");
        assert_eq!(node.method_name(), "MatchBest(code)");
        assert_eq!(node.to_string(), "compNameBest");
    }

    #[test]
    fn test_leaf_description_is_heuristic_name() {
        assert_eq!(leaf("pathResemblance").description(), "pathResemblance");
    }

    #[test]
    fn test_child() {
        let single = Node::match_best(EndpointSide::Architecture, leaf("a")).unwrap();
        assert_eq!(single.child().unwrap().description(), "a");

        let pair = Node::maximum([leaf("a"), leaf("b")]).unwrap();
        assert!(matches!(
            pair.child(),
            Err(EngineError::NotExactlyOneChild { count: 2, .. })
        ));
    }

    #[test]
    fn test_filter_architecture_orders_primary_first() {
        let node = Node::filter_architecture(leaf("primary"), [leaf("f1"), leaf("f2")]).unwrap();
        let names: Vec<String> = node.children().iter().map(|c| c.description()).collect();
        assert_eq!(names, ["primary", "f1", "f2"]);
    }

    #[test]
    fn test_combinators_compare_by_parameters() {
        let a: Combinator = ConfidenceAggregator::threshold(0.4).unwrap().into();
        let b: Combinator = ConfidenceAggregator::threshold(0.4).unwrap().into();
        assert_eq!(a, b);
        assert_ne!(a, Combinator::from(Matcher::filter_code()));
    }
}
