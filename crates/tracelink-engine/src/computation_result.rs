//! Tree-wide memo of node results
//!
//! A computation's result maps every computed node to its [`NodeResult`].
//! Entries are added bottom-up while the tree is evaluated and are never
//! removed.

use crate::{Node, NodeId, NodeResult};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracelink_domain::{Confidence, EndpointTuple, TraceLink};
use tracing::warn;

/// Results of every computed node, keyed by node identity
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComputationResult {
    results: BTreeMap<NodeId, NodeResult>,
}

impl ComputationResult {
    /// An empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Confidence of `tuple` in `node`'s result
    ///
    /// `None` if the node has not been computed or its result has no entry
    /// for the tuple.
    pub fn confidence_of(&self, node: &Node, tuple: &EndpointTuple) -> Option<Confidence> {
        self.result_for(node)?.confidence_of(tuple)
    }

    /// The recorded result of `node`
    pub fn result_for(&self, node: &Node) -> Option<&NodeResult> {
        self.results.get(&node.id())
    }

    /// Whether `node` has a recorded result
    pub fn contains(&self, node: &Node) -> bool {
        self.results.contains_key(&node.id())
    }

    /// Record `node`'s result, replacing an earlier one
    pub fn record_result(&mut self, node: &Node, result: NodeResult) {
        if self.results.insert(node.id(), result).is_some() {
            warn!(node = %node, "Overwrote existing node result");
        }
    }

    /// Add every entry of another (sibling or earlier) computation result
    pub fn merge_partial(&mut self, other: ComputationResult) {
        self.results.extend(other.results);
    }

    /// Trace links of `node`'s result; empty if the node was not computed
    pub fn trace_links_for(&self, node: &Node) -> BTreeSet<TraceLink> {
        self.result_for(node)
            .map(NodeResult::trace_links)
            .unwrap_or_default()
    }

    /// Number of computed nodes
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether no node has been computed
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Per-level confidences of `tuple` in the subtree rooted at `node`
    ///
    /// One line per node, `"Level d: <node>, Confidence: <confidence>"`,
    /// with the root at level 1 and lines sorted by level. A shared node
    /// reached twice on the same level is listed once.
    pub fn explanation_chain(&self, node: &Node, tuple: &EndpointTuple) -> Vec<String> {
        let mut lines: Vec<(String, usize)> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        self.collect_levels(node, tuple, 1, &mut lines, &mut seen);

        lines.sort_by_key(|(_, level)| *level);
        lines.into_iter().map(|(line, _)| line).collect()
    }

    fn collect_levels(
        &self,
        node: &Node,
        tuple: &EndpointTuple,
        level: usize,
        lines: &mut Vec<(String, usize)>,
        seen: &mut HashSet<String>,
    ) {
        let confidence = match self.confidence_of(node, tuple) {
            Some(confidence) => confidence.to_string(),
            None => "not computed".to_string(),
        };
        let line = format!("Level {}: {}, Confidence: {}", level, node, confidence);
        if seen.insert(line.clone()) {
            lines.push((line, level));
        }

        for child in node.children() {
            self.collect_levels(child, tuple, level + 1, lines, seen);
        }
    }
}
