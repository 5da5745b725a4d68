//! Tracelink Domain Layer
//!
//! Value objects shared by every stage of trace-link recovery between
//! architecture models and code. The crate keeps its dependencies minimal
//! (error derivation and serialization only) and defines the model
//! boundary that loaders implement.
//!
//! ## Key Concepts
//!
//! - **Confidence**: optional belief in [0, 1]; absent means "no opinion", not zero
//! - **Endpoint**: an element of the architecture model or of the code model
//! - **Endpoint tuple**: a candidate (architecture, code) pairing
//! - **Endpoint tuple repo**: the full cross product for one model pair
//! - **Trace link**: a tuple whose final confidence has a value

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod confidence;
pub mod endpoint;
pub mod error;
pub mod model;
pub mod traits;
pub mod tuple_repo;

// Re-exports for convenience
pub use confidence::Confidence;
pub use endpoint::{
    ArchitectureEndpoint, ArchitectureKind, CodeEndpoint, Endpoint, EndpointSide, EndpointTuple,
    TraceLink,
};
pub use error::DomainError;
pub use model::{InMemoryArchitectureModel, InMemoryCodeModel};
pub use traits::{ArchitectureModel, CodeModel};
pub use tuple_repo::EndpointTupleRepo;
