//! Endpoint module - the two sides of a candidate trace link
//!
//! A trace link always relates one architecture endpoint to one code
//! endpoint, so the pair is modelled as an ordered (architecture, code)
//! tuple even though either side can be used to look it up.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Kind of architecture element
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchitectureKind {
    /// A component (basic or composite)
    #[default]
    Component,

    /// An interface provided or required by components
    Interface,
}

/// An addressable element of the architecture model
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ArchitectureEndpoint {
    /// Model-unique identifier
    pub id: String,

    /// Display name (e.g. the component name)
    pub name: String,

    /// Component or interface
    #[serde(default)]
    pub kind: ArchitectureKind,
}

impl ArchitectureEndpoint {
    /// Create an architecture component endpoint
    pub fn component(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: ArchitectureKind::Component,
        }
    }

    /// Create an architecture interface endpoint
    pub fn interface(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: ArchitectureKind::Interface,
        }
    }
}

/// An addressable element of the code model (a compilation unit)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CodeEndpoint {
    /// Model-unique identifier
    pub id: String,

    /// Display name (e.g. the file or type name)
    pub name: String,

    /// Source path, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl CodeEndpoint {
    /// Create a code endpoint without a path
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            path: None,
        }
    }

    /// Attach a source path
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// Which model an endpoint belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointSide {
    /// The architecture model
    Architecture,

    /// The code model
    Code,
}

impl EndpointSide {
    /// Get the side name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointSide::Architecture => "architecture",
            EndpointSide::Code => "code",
        }
    }

    /// The opposite side
    pub fn opposite(&self) -> Self {
        match self {
            EndpointSide::Architecture => EndpointSide::Code,
            EndpointSide::Code => EndpointSide::Architecture,
        }
    }
}

impl fmt::Display for EndpointSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An endpoint from either model
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Endpoint {
    /// Architecture-side endpoint
    Architecture(Arc<ArchitectureEndpoint>),

    /// Code-side endpoint
    Code(Arc<CodeEndpoint>),
}

impl Endpoint {
    /// The side this endpoint belongs to
    pub fn side(&self) -> EndpointSide {
        match self {
            Endpoint::Architecture(_) => EndpointSide::Architecture,
            Endpoint::Code(_) => EndpointSide::Code,
        }
    }

    /// Model-unique identifier
    pub fn id(&self) -> &str {
        match self {
            Endpoint::Architecture(endpoint) => &endpoint.id,
            Endpoint::Code(endpoint) => &endpoint.id,
        }
    }

    /// Display name
    pub fn name(&self) -> &str {
        match self {
            Endpoint::Architecture(endpoint) => &endpoint.name,
            Endpoint::Code(endpoint) => &endpoint.name,
        }
    }
}

impl From<ArchitectureEndpoint> for Endpoint {
    fn from(endpoint: ArchitectureEndpoint) -> Self {
        Endpoint::Architecture(Arc::new(endpoint))
    }
}

impl From<CodeEndpoint> for Endpoint {
    fn from(endpoint: CodeEndpoint) -> Self {
        Endpoint::Code(Arc::new(endpoint))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.side(), self.name())
    }
}

/// A candidate pairing of one architecture and one code endpoint
///
/// Identity is the pair of referenced endpoints. Tuples are created once
/// per cross-product entry by [`EndpointTupleRepo`](crate::EndpointTupleRepo)
/// and are cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EndpointTuple {
    architecture: Arc<ArchitectureEndpoint>,
    code: Arc<CodeEndpoint>,
}

impl EndpointTuple {
    /// Create a tuple from shared endpoints
    pub fn new(architecture: Arc<ArchitectureEndpoint>, code: Arc<CodeEndpoint>) -> Self {
        Self { architecture, code }
    }

    /// The architecture-side endpoint
    pub fn architecture_endpoint(&self) -> &ArchitectureEndpoint {
        &self.architecture
    }

    /// The code-side endpoint
    pub fn code_endpoint(&self) -> &CodeEndpoint {
        &self.code
    }

    /// The endpoint on the given side
    pub fn endpoint(&self, side: EndpointSide) -> Endpoint {
        match side {
            EndpointSide::Architecture => Endpoint::Architecture(Arc::clone(&self.architecture)),
            EndpointSide::Code => Endpoint::Code(Arc::clone(&self.code)),
        }
    }

    /// Whether `endpoint` is one of the two sides of this tuple
    pub fn has_endpoint(&self, endpoint: &Endpoint) -> bool {
        match endpoint {
            Endpoint::Architecture(a) => self.architecture == *a,
            Endpoint::Code(c) => self.code == *c,
        }
    }

    /// The endpoint opposite to `endpoint`, or `None` if `endpoint` is not
    /// part of this tuple
    pub fn other_endpoint(&self, endpoint: &Endpoint) -> Option<Endpoint> {
        if !self.has_endpoint(endpoint) {
            return None;
        }
        Some(self.endpoint(endpoint.side().opposite()))
    }
}

impl fmt::Display for EndpointTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.architecture.name, self.code.name)
    }
}

/// A recovered trace link between an architecture and a code endpoint
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TraceLink {
    /// Architecture-side endpoint
    pub architecture: ArchitectureEndpoint,

    /// Code-side endpoint
    pub code: CodeEndpoint,
}

impl From<&EndpointTuple> for TraceLink {
    fn from(tuple: &EndpointTuple) -> Self {
        Self {
            architecture: tuple.architecture_endpoint().clone(),
            code: tuple.code_endpoint().clone(),
        }
    }
}

impl fmt::Display for TraceLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.architecture.name, self.code.name)
    }
}
