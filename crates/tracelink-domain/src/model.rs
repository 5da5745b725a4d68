//! In-memory model implementations

use crate::traits::{ArchitectureModel, CodeModel};
use crate::{ArchitectureEndpoint, CodeEndpoint};
use serde::{Deserialize, Serialize};

/// Architecture model backed by a plain list of endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InMemoryArchitectureModel {
    /// Model endpoints
    #[serde(default)]
    pub endpoints: Vec<ArchitectureEndpoint>,
}

impl InMemoryArchitectureModel {
    /// Create a model from endpoints
    pub fn new(endpoints: impl IntoIterator<Item = ArchitectureEndpoint>) -> Self {
        Self {
            endpoints: endpoints.into_iter().collect(),
        }
    }

    /// Add an endpoint
    pub fn push(&mut self, endpoint: ArchitectureEndpoint) {
        self.endpoints.push(endpoint);
    }
}

impl ArchitectureModel for InMemoryArchitectureModel {
    fn endpoints(&self) -> Vec<ArchitectureEndpoint> {
        self.endpoints.clone()
    }
}

/// Code model backed by a plain list of endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InMemoryCodeModel {
    /// Model endpoints
    #[serde(default)]
    pub endpoints: Vec<CodeEndpoint>,
}

impl InMemoryCodeModel {
    /// Create a model from endpoints
    pub fn new(endpoints: impl IntoIterator<Item = CodeEndpoint>) -> Self {
        Self {
            endpoints: endpoints.into_iter().collect(),
        }
    }

    /// Add an endpoint
    pub fn push(&mut self, endpoint: CodeEndpoint) {
        self.endpoints.push(endpoint);
    }
}

impl CodeModel for InMemoryCodeModel {
    fn endpoints(&self) -> Vec<CodeEndpoint> {
        self.endpoints.clone()
    }
}
