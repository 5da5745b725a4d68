//! Trait definitions for the model boundary
//!
//! Loading architecture and code models from external formats happens
//! outside this workspace. Anything that can list its endpoints can take
//! part in trace-link recovery.

use crate::{ArchitectureEndpoint, CodeEndpoint};

/// An architecture model (components and interfaces)
pub trait ArchitectureModel: Send + Sync {
    /// All endpoints of this model
    fn endpoints(&self) -> Vec<ArchitectureEndpoint>;
}

/// A code model (compilation units)
pub trait CodeModel: Send + Sync {
    /// All endpoints of this model
    fn endpoints(&self) -> Vec<CodeEndpoint>;
}
