//! Per-endpoint matching
//!
//! A [`Matcher`] walks the endpoints of one side and, for each endpoint,
//! selects among its children's results. The per-endpoint partial results
//! are merged over a result seeded with every tuple absent, so the node's
//! result is total even for endpoints that matched nothing.

use crate::{EngineError, EvaluationContext, NodeResult};
use std::collections::BTreeMap;
use std::fmt;
use tracelink_domain::{Confidence, Endpoint, EndpointSide};

/// Selection strategy applied per endpoint of one side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Matcher {
    /// Keep the first child's links that no other child explains
    Filter {
        /// Side whose endpoints are iterated
        side: EndpointSide,
        /// Keep the filtered result even when it removes every link
        filter_always: bool,
    },

    /// Keep every tuple scoring the best confidence across all children
    MatchBest {
        /// Side whose endpoints are iterated
        side: EndpointSide,
    },

    /// Take the first child that links the endpoint at all
    MatchSequentially {
        /// Side whose endpoints are iterated
        side: EndpointSide,
    },
}

impl Matcher {
    /// Filter on the architecture side
    pub fn filter_architecture() -> Self {
        Matcher::Filter {
            side: EndpointSide::Architecture,
            filter_always: false,
        }
    }

    /// Filter on the code side
    pub fn filter_code() -> Self {
        Matcher::Filter {
            side: EndpointSide::Code,
            filter_always: false,
        }
    }

    /// Filter on the architecture side, even if nothing remains
    pub fn filter_always_architecture() -> Self {
        Matcher::Filter {
            side: EndpointSide::Architecture,
            filter_always: true,
        }
    }

    /// Best match per endpoint of `side`
    pub fn match_best(side: EndpointSide) -> Self {
        Matcher::MatchBest { side }
    }

    /// Sequential match per endpoint of `side`
    pub fn match_sequentially(side: EndpointSide) -> Self {
        Matcher::MatchSequentially { side }
    }

    /// Side whose endpoints are iterated
    pub fn side(&self) -> EndpointSide {
        match self {
            Matcher::Filter { side, .. }
            | Matcher::MatchBest { side }
            | Matcher::MatchSequentially { side } => *side,
        }
    }

    /// Partial result for a single endpoint
    ///
    /// Contains only tuples of `endpoint`; an empty result means the
    /// endpoint contributes nothing.
    pub fn match_endpoint(&self, endpoint: &Endpoint, children: &[&NodeResult]) -> NodeResult {
        match self {
            Matcher::Filter { filter_always, .. } => filter(endpoint, children, *filter_always),
            Matcher::MatchBest { .. } => match_best(endpoint, children),
            Matcher::MatchSequentially { .. } => match_sequentially(endpoint, children),
        }
    }

    /// Evaluate the node over every endpoint of the matcher's side
    ///
    /// Each child is split per endpoint once up front, so matching an
    /// endpoint only looks at that endpoint's tuples.
    pub(crate) fn calculate(
        &self,
        ctx: &EvaluationContext<'_>,
        children: &[&NodeResult],
    ) -> Result<NodeResult, EngineError> {
        let side = self.side();
        let endpoints = ctx.repo.endpoints(side);
        let parts: Vec<BTreeMap<Endpoint, NodeResult>> = children
            .iter()
            .map(|child| child.partition_by(side))
            .collect();
        let empty = NodeResult::new();

        let partials = ctx.try_map(&endpoints, |endpoint| {
            let slices: Vec<&NodeResult> = parts
                .iter()
                .map(|part| part.get(endpoint).unwrap_or(&empty))
                .collect();
            Ok(self.match_endpoint(endpoint, &slices))
        })?;

        Ok(partials
            .into_iter()
            .fold(NodeResult::seeded(ctx.repo), NodeResult::merge))
    }
}

fn filter(endpoint: &Endpoint, children: &[&NodeResult], filter_always: bool) -> NodeResult {
    let Some((first, others)) = children.split_first() else {
        return NodeResult::new();
    };

    let unfiltered = first.result_for_endpoint(endpoint);
    let filtered = others
        .iter()
        .fold(unfiltered.clone(), |result, other| result.filter(other));

    if !filter_always && !filtered.has_trace_link(endpoint) {
        return unfiltered;
    }
    filtered
}

fn match_best(endpoint: &Endpoint, children: &[&NodeResult]) -> NodeResult {
    let best = children
        .iter()
        .map(|child| child.best_confidence_for(endpoint))
        .max()
        .unwrap_or_else(Confidence::absent);

    if !best.has_value() {
        return NodeResult::new();
    }

    children.iter().fold(NodeResult::new(), |result, child| {
        result.merge(child.tuples_at_confidence(endpoint, best))
    })
}

fn match_sequentially(endpoint: &Endpoint, children: &[&NodeResult]) -> NodeResult {
    children
        .iter()
        .find(|child| child.has_trace_link(endpoint))
        .map(|child| child.result_for_endpoint(endpoint))
        .unwrap_or_default()
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Filter {
                side,
                filter_always: false,
            } => write!(f, "Filter({})", side),
            Matcher::Filter {
                side,
                filter_always: true,
            } => write!(f, "FilterAlways({})", side),
            Matcher::MatchBest { side } => write!(f, "MatchBest({})", side),
            Matcher::MatchSequentially { side } => write!(f, "MatchSequentially({})", side),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use crate::{CancellationToken, EngineConfig};
    use tracelink_domain::{EndpointTupleRepo, InMemoryArchitectureModel, InMemoryCodeModel};

    #[test]
    fn test_filter_keeps_unexplained_links() {
        let repo = repo(&["e"], &["x", "y"]);
        let primary = result(&repo, &[("e", "x", 0.9), ("e", "y", 0.8)]);
        let explained = result(&repo, &[("e", "x", 1.0)]);

        let out = Matcher::filter_architecture()
            .match_endpoint(&arch_endpoint("e"), &[&primary, &explained]);
        assert_eq!(out.confidence_of(&tuple("e", "x")), Some(Confidence::absent()));
        assert_eq!(out.confidence_of(&tuple("e", "y")), Some(conf(0.8)));
    }

    #[test]
    fn test_filter_falls_back_when_everything_is_explained() {
        let repo = repo(&["e"], &["x", "y"]);
        let primary = result(&repo, &[("e", "x", 0.9), ("e", "y", 0.8)]);
        let explained = result(&repo, &[("e", "x", 1.0), ("e", "y", 1.0)]);

        let out = Matcher::filter_architecture()
            .match_endpoint(&arch_endpoint("e"), &[&primary, &explained]);
        assert_eq!(out, primary.result_for_endpoint(&arch_endpoint("e")));
    }

    #[test]
    fn test_filter_always_may_empty_the_endpoint() {
        let repo = repo(&["e"], &["x"]);
        let primary = result(&repo, &[("e", "x", 0.9)]);
        let explained = result(&repo, &[("e", "x", 0.1)]);

        let out = Matcher::filter_always_architecture()
            .match_endpoint(&arch_endpoint("e"), &[&primary, &explained]);
        assert!(!out.has_trace_link(&arch_endpoint("e")));
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_filter_on_code_side() {
        let repo = repo(&["a1", "a2"], &["c"]);
        let primary = result(&repo, &[("a1", "c", 0.9), ("a2", "c", 0.5)]);
        let explained = result(&repo, &[("a2", "c", 0.5)]);

        let out =
            Matcher::filter_code().match_endpoint(&code_endpoint("c"), &[&primary, &explained]);
        assert_eq!(out.trace_links().len(), 1);
        assert_eq!(out.confidence_of(&tuple("a1", "c")), Some(conf(0.9)));
    }

    #[test]
    fn test_match_best_keeps_ties_across_children() {
        let repo = repo(&["e"], &["x", "y", "z"]);
        let low = result(&repo, &[("e", "x", 0.4)]);
        let tie_a = result(&repo, &[("e", "y", 0.7), ("e", "x", 0.1)]);
        let tie_b = result(&repo, &[("e", "z", 0.7)]);

        let out = Matcher::match_best(EndpointSide::Architecture)
            .match_endpoint(&arch_endpoint("e"), &[&low, &tie_a, &tie_b]);
        assert_eq!(out.len(), 2);
        assert_eq!(out.confidence_of(&tuple("e", "y")), Some(conf(0.7)));
        assert_eq!(out.confidence_of(&tuple("e", "z")), Some(conf(0.7)));
        assert_eq!(out.confidence_of(&tuple("e", "x")), None);
    }

    #[test]
    fn test_match_best_without_any_value_contributes_nothing() {
        let repo = repo(&["e"], &["x"]);
        let empty = NodeResult::seeded(&repo);
        let out = Matcher::match_best(EndpointSide::Architecture)
            .match_endpoint(&arch_endpoint("e"), &[&empty]);
        assert!(out.is_empty());
    }

    #[test]
    fn test_match_sequentially_takes_first_linking_child() {
        let repo = repo(&["e"], &["x", "y", "z"]);
        let none = NodeResult::seeded(&repo);
        let second = result(&repo, &[("e", "y", 0.2)]);
        let third = result(&repo, &[("e", "z", 0.9)]);

        let out = Matcher::match_sequentially(EndpointSide::Architecture)
            .match_endpoint(&arch_endpoint("e"), &[&none, &second, &third]);
        assert_eq!(out, second.result_for_endpoint(&arch_endpoint("e")));
        assert_eq!(out.confidence_of(&tuple("e", "z")), Some(Confidence::absent()));
    }

    #[test]
    fn test_match_sequentially_without_links() {
        let repo = repo(&["e"], &["x"]);
        let none = NodeResult::seeded(&repo);
        let out = Matcher::match_sequentially(EndpointSide::Code)
            .match_endpoint(&code_endpoint("x"), &[&none]);
        assert!(out.is_empty());
    }

    #[test]
    fn test_calculate_agrees_with_per_endpoint_matching() {
        let arch_model = InMemoryArchitectureModel::new([arch("a1"), arch("a2"), arch("a3")]);
        let code_model = InMemoryCodeModel::new([code("c1"), code("c2"), code("c3"), code("c4")]);
        let repo = EndpointTupleRepo::build(&arch_model, &code_model);
        let config = EngineConfig::default();
        let cancellation = CancellationToken::new();
        let ctx = EvaluationContext {
            architecture_model: &arch_model,
            code_model: &code_model,
            repo: &repo,
            config: &config,
            cancellation: &cancellation,
        };

        let first = result(&repo, &[("a1", "c1", 0.9), ("a1", "c2", 0.9), ("a2", "c3", 0.4)]);
        let second = result(&repo, &[("a1", "c2", 0.5), ("a3", "c4", 0.7), ("a2", "c1", 0.4)]);
        let children = [&first, &second];

        for matcher in [
            Matcher::filter_architecture(),
            Matcher::filter_code(),
            Matcher::filter_always_architecture(),
            Matcher::match_best(EndpointSide::Architecture),
            Matcher::match_best(EndpointSide::Code),
            Matcher::match_sequentially(EndpointSide::Architecture),
            Matcher::match_sequentially(EndpointSide::Code),
        ] {
            let expected = repo
                .endpoints(matcher.side())
                .iter()
                .map(|endpoint| matcher.match_endpoint(endpoint, &children))
                .fold(NodeResult::seeded(&repo), NodeResult::merge);

            let out = matcher.calculate(&ctx, &children).unwrap();
            assert_eq!(out, expected, "{}", matcher);
            assert!(out.is_total_over(&repo));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Matcher::filter_architecture().to_string(), "Filter(architecture)");
        assert_eq!(Matcher::filter_always_architecture().to_string(), "FilterAlways(architecture)");
        assert_eq!(Matcher::match_best(EndpointSide::Code).to_string(), "MatchBest(code)");
        assert_eq!(
            Matcher::match_sequentially(EndpointSide::Architecture).to_string(),
            "MatchSequentially(architecture)"
        );
    }
}
