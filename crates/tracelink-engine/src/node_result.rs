//! The result of a single computation node
//!
//! A node's final result maps every endpoint tuple of the repo to a
//! [`Confidence`]. Partial results (restricted to one endpoint, or holding
//! only the tuples at a given confidence) exist while a combinator stages
//! its output and are merged into a total result before it is recorded.

use std::collections::btree_map;
use std::collections::{BTreeMap, BTreeSet};
use tracelink_domain::{
    Confidence, Endpoint, EndpointSide, EndpointTuple, EndpointTupleRepo, TraceLink,
};

/// Per-tuple confidences of one node
///
/// Query methods never mutate the receiver; derived variants are new
/// values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeResult {
    confidences: BTreeMap<EndpointTuple, Confidence>,
}

impl NodeResult {
    /// An empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// A total result with every tuple of `repo` absent
    pub fn seeded(repo: &EndpointTupleRepo) -> Self {
        repo.iter()
            .map(|tuple| (tuple.clone(), Confidence::absent()))
            .collect()
    }

    /// Stage the confidence of a tuple, replacing any previous entry
    pub fn insert(&mut self, tuple: EndpointTuple, confidence: Confidence) {
        self.confidences.insert(tuple, confidence);
    }

    /// Stored confidence of `tuple`, or `None` if it has no entry at all
    pub fn confidence_of(&self, tuple: &EndpointTuple) -> Option<Confidence> {
        self.confidences.get(tuple).copied()
    }

    /// Highest confidence among tuples containing `endpoint`
    ///
    /// Absent if there are no such tuples or all of them are absent.
    pub fn best_confidence_for(&self, endpoint: &Endpoint) -> Confidence {
        self.entries_for(endpoint)
            .map(|(_, confidence)| *confidence)
            .max()
            .unwrap_or_default()
    }

    /// Tuples containing `endpoint` whose confidence equals `confidence`
    pub fn tuples_at_confidence(&self, endpoint: &Endpoint, confidence: Confidence) -> NodeResult {
        self.entries_for(endpoint)
            .filter(|(_, other)| **other == confidence)
            .map(|(tuple, other)| (tuple.clone(), *other))
            .collect()
    }

    /// Endpoints linked to `endpoint` by a present confidence
    pub fn linked_endpoints(&self, endpoint: &Endpoint) -> BTreeSet<Endpoint> {
        self.entries_for(endpoint)
            .filter(|(_, confidence)| confidence.has_value())
            .filter_map(|(tuple, _)| tuple.other_endpoint(endpoint))
            .collect()
    }

    /// Whether some tuple containing `endpoint` has a present confidence
    pub fn has_trace_link(&self, endpoint: &Endpoint) -> bool {
        self.entries_for(endpoint)
            .any(|(_, confidence)| confidence.has_value())
    }

    /// Tuples with a present confidence
    pub fn linked_tuples(&self) -> impl Iterator<Item = &EndpointTuple> {
        self.confidences
            .iter()
            .filter(|(_, confidence)| confidence.has_value())
            .map(|(tuple, _)| tuple)
    }

    /// Trace links for every tuple with a present confidence
    pub fn trace_links(&self) -> BTreeSet<TraceLink> {
        self.linked_tuples().map(TraceLink::from).collect()
    }

    /// The entries of tuples containing `endpoint`, confidences unchanged
    pub fn result_for_endpoint(&self, endpoint: &Endpoint) -> NodeResult {
        self.entries_for(endpoint)
            .map(|(tuple, confidence)| (tuple.clone(), *confidence))
            .collect()
    }

    /// Split into one result per endpoint of `side`
    ///
    /// Each part equals [`result_for_endpoint`](Self::result_for_endpoint)
    /// of its endpoint; the whole split is a single pass over the entries.
    pub fn partition_by(&self, side: EndpointSide) -> BTreeMap<Endpoint, NodeResult> {
        let mut parts: BTreeMap<Endpoint, NodeResult> = BTreeMap::new();
        for (tuple, confidence) in &self.confidences {
            parts
                .entry(tuple.endpoint(side))
                .or_default()
                .insert(tuple.clone(), *confidence);
        }
        parts
    }

    /// Suppress every tuple that `other` already explains
    ///
    /// Tuples with a present confidence in `other` become absent; all other
    /// entries are kept as they are. The set of trace links can only
    /// shrink.
    pub fn filter(&self, other: &NodeResult) -> NodeResult {
        self.confidences
            .iter()
            .map(|(tuple, confidence)| {
                let explained = other
                    .confidence_of(tuple)
                    .is_some_and(|c| c.has_value());
                if explained {
                    (tuple.clone(), Confidence::absent())
                } else {
                    (tuple.clone(), *confidence)
                }
            })
            .collect()
    }

    /// Union of both results; on collision the entry of `other` wins
    pub fn merge(mut self, other: NodeResult) -> NodeResult {
        self.confidences.extend(other.confidences);
        self
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.confidences.len()
    }

    /// Whether there are no entries
    pub fn is_empty(&self) -> bool {
        self.confidences.is_empty()
    }

    /// Number of entries with a present confidence
    pub fn present_count(&self) -> usize {
        self.linked_tuples().count()
    }

    /// Whether every tuple of `repo` has an entry
    pub fn is_total_over(&self, repo: &EndpointTupleRepo) -> bool {
        repo.iter().all(|tuple| self.confidences.contains_key(tuple))
    }

    /// Iterate over all entries in tuple order
    pub fn iter(&self) -> btree_map::Iter<'_, EndpointTuple, Confidence> {
        self.confidences.iter()
    }

    fn entries_for<'a>(
        &'a self,
        endpoint: &'a Endpoint,
    ) -> impl Iterator<Item = (&'a EndpointTuple, &'a Confidence)> + 'a {
        self.confidences
            .iter()
            .filter(move |(tuple, _)| tuple.has_endpoint(endpoint))
    }
}

impl FromIterator<(EndpointTuple, Confidence)> for NodeResult {
    fn from_iter<I: IntoIterator<Item = (EndpointTuple, Confidence)>>(iter: I) -> Self {
        Self {
            confidences: iter.into_iter().collect(),
        }
    }
}

impl Extend<(EndpointTuple, Confidence)> for NodeResult {
    fn extend<I: IntoIterator<Item = (EndpointTuple, Confidence)>>(&mut self, iter: I) {
        self.confidences.extend(iter);
    }
}

impl<'a> IntoIterator for &'a NodeResult {
    type Item = (&'a EndpointTuple, &'a Confidence);
    type IntoIter = btree_map::Iter<'a, EndpointTuple, Confidence>;

    fn into_iter(self) -> Self::IntoIter {
        self.confidences.iter()
    }
}
