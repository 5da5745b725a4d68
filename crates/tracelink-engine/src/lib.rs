//! Tracelink Engine
//!
//! Confidence-aggregation engine that decides, for every pairing of an
//! architecture endpoint and a code endpoint, whether a trace link holds.
//!
//! # Overview
//!
//! Decisions are made by a small declarative tree of computation nodes:
//! - **Leaves** contribute raw per-tuple confidences through a [`Heuristic`]
//! - **Aggregators** ([`ConfidenceAggregator`]) combine children elementwise, per tuple
//! - **Matchers** ([`Matcher`]) select among children per endpoint of one side
//!
//! Every node produces a [`NodeResult`] that is total over the
//! [`EndpointTupleRepo`](tracelink_domain::EndpointTupleRepo) of the run.
//! Results are memoized in a [`ComputationResult`] keyed by [`NodeId`], so
//! subtrees shared between parents are computed once. The root's present
//! confidences are the final trace links.
//!
//! | Combinator | Unit | Rule |
//! |------------|------|------|
//! | **Average** | tuple | Σ wᵢ·vᵢ over present children / Σ wᵢ over all children |
//! | **Maximum** | tuple | Largest confidence, absent below any value |
//! | **Threshold** | tuple | Maximum if it reaches the limit, absent otherwise |
//! | **Filter** | endpoint | First child's links not explained by the others |
//! | **MatchBest** | endpoint | Every tuple at the best confidence across children |
//! | **MatchSequentially** | endpoint | First child that links the endpoint |
//!
//! # Usage
//!
//! ```
//! use tracelink_domain::{
//!     ArchitectureEndpoint, CodeEndpoint, Confidence, InMemoryArchitectureModel,
//!     InMemoryCodeModel,
//! };
//! use tracelink_engine::{Computation, ConfidenceTable, EngineConfig, Node};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let architecture = InMemoryArchitectureModel::new([
//!     ArchitectureEndpoint::component("a1", "Storage"),
//!     ArchitectureEndpoint::component("a2", "Frontend"),
//! ]);
//! let code = InMemoryCodeModel::new([CodeEndpoint::new("c1", "storage.rs")]);
//!
//! let names = ConfidenceTable::new("names")
//!     .with("a1", "c1", Confidence::of(0.8)?);
//! let paths = ConfidenceTable::new("paths")
//!     .with("a1", "c1", Confidence::of(0.4)?)
//!     .with("a2", "c1", Confidence::of(0.2)?);
//!
//! let average = Node::average([Node::leaf(names).into_ref(), Node::leaf(paths).into_ref()])?;
//! let root = Node::threshold(0.5, [average.into_ref()])?.into_ref();
//!
//! let links = Computation::new(root)
//!     .with_config(EngineConfig::default())
//!     .trace_links(&architecture, &code)?;
//! assert_eq!(links.len(), 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod aggregation;
mod cancellation;
mod computation;
mod computation_result;
mod config;
mod context;
mod error;
mod heuristic;
mod matcher;
mod node;
mod node_result;

#[cfg(test)]
mod test_support;

pub use aggregation::{ConfidenceAggregator, ZeroNumerator};
pub use cancellation::CancellationToken;
pub use computation::Computation;
pub use computation_result::ComputationResult;
pub use config::{ConfigError, EngineConfig};
pub use context::EvaluationContext;
pub use error::EngineError;
pub use heuristic::{ConfidenceTable, Heuristic, HeuristicContext};
pub use matcher::Matcher;
pub use node::{Combinator, Node, NodeId, NodeKind, NodeRef};
pub use node_result::NodeResult;
