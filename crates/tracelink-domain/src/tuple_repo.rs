//! Endpoint tuple repository
//!
//! Materializes the full cross product of architecture and code endpoints
//! once per model pair. The repository is read-only after construction.

use crate::traits::{ArchitectureModel, CodeModel};
use crate::{ArchitectureEndpoint, CodeEndpoint, Endpoint, EndpointSide, EndpointTuple};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Every (architecture, code) endpoint tuple of a model pair
///
/// Endpoints are deduplicated and kept in sorted order so that iteration
/// is deterministic; tuples are ordered architecture-major.
#[derive(Debug, Clone, Default)]
pub struct EndpointTupleRepo {
    architecture_endpoints: Vec<Arc<ArchitectureEndpoint>>,
    code_endpoints: Vec<Arc<CodeEndpoint>>,
    tuples: Vec<EndpointTuple>,
}

impl EndpointTupleRepo {
    /// Build the cross product of the endpoints of both models
    ///
    /// # Examples
    ///
    /// ```
    /// use tracelink_domain::{ArchitectureEndpoint, CodeEndpoint, EndpointTupleRepo};
    /// use tracelink_domain::{InMemoryArchitectureModel, InMemoryCodeModel};
    ///
    /// let arch = InMemoryArchitectureModel::new([ArchitectureEndpoint::component("a1", "A")]);
    /// let code = InMemoryCodeModel::new([
    ///     CodeEndpoint::new("c1", "x.rs"),
    ///     CodeEndpoint::new("c2", "y.rs"),
    /// ]);
    ///
    /// let repo = EndpointTupleRepo::build(&arch, &code);
    /// assert_eq!(repo.len(), 2);
    /// ```
    pub fn build(architecture_model: &dyn ArchitectureModel, code_model: &dyn CodeModel) -> Self {
        Self::from_endpoints(architecture_model.endpoints(), code_model.endpoints())
    }

    /// Build the cross product of two endpoint lists
    pub fn from_endpoints(
        architecture_endpoints: impl IntoIterator<Item = ArchitectureEndpoint>,
        code_endpoints: impl IntoIterator<Item = CodeEndpoint>,
    ) -> Self {
        let architecture_endpoints: Vec<Arc<ArchitectureEndpoint>> = architecture_endpoints
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(Arc::new)
            .collect();
        let code_endpoints: Vec<Arc<CodeEndpoint>> = code_endpoints
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(Arc::new)
            .collect();

        let mut tuples = Vec::with_capacity(architecture_endpoints.len() * code_endpoints.len());
        for architecture in &architecture_endpoints {
            for code in &code_endpoints {
                tuples.push(EndpointTuple::new(Arc::clone(architecture), Arc::clone(code)));
            }
        }

        Self {
            architecture_endpoints,
            code_endpoints,
            tuples,
        }
    }

    /// All tuples, architecture-major
    pub fn tuples(&self) -> &[EndpointTuple] {
        &self.tuples
    }

    /// Iterate over all tuples
    pub fn iter(&self) -> std::slice::Iter<'_, EndpointTuple> {
        self.tuples.iter()
    }

    /// Number of tuples (architecture endpoints × code endpoints)
    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    /// Whether either model has no endpoints
    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    /// Distinct architecture endpoints
    pub fn architecture_endpoints(&self) -> &[Arc<ArchitectureEndpoint>] {
        &self.architecture_endpoints
    }

    /// Distinct code endpoints
    pub fn code_endpoints(&self) -> &[Arc<CodeEndpoint>] {
        &self.code_endpoints
    }

    /// Distinct endpoints of one side
    pub fn endpoints(&self, side: EndpointSide) -> Vec<Endpoint> {
        match side {
            EndpointSide::Architecture => self
                .architecture_endpoints
                .iter()
                .map(|e| Endpoint::Architecture(Arc::clone(e)))
                .collect(),
            EndpointSide::Code => self
                .code_endpoints
                .iter()
                .map(|e| Endpoint::Code(Arc::clone(e)))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a EndpointTupleRepo {
    type Item = &'a EndpointTuple;
    type IntoIter = std::slice::Iter<'a, EndpointTuple>;

    fn into_iter(self) -> Self::IntoIter {
        self.tuples.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InMemoryArchitectureModel, InMemoryCodeModel};

    fn arch(n: usize) -> InMemoryArchitectureModel {
        InMemoryArchitectureModel::new(
            (0..n).map(|i| ArchitectureEndpoint::component(format!("a{}", i), format!("A{}", i))),
        )
    }

    fn code(n: usize) -> InMemoryCodeModel {
        InMemoryCodeModel::new(
            (0..n).map(|i| CodeEndpoint::new(format!("c{}", i), format!("c{}.rs", i))),
        )
    }

    #[test]
    fn test_cardinality() {
        let repo = EndpointTupleRepo::build(&arch(3), &code(4));
        assert_eq!(repo.len(), 12);
        assert_eq!(repo.architecture_endpoints().len(), 3);
        assert_eq!(repo.code_endpoints().len(), 4);
    }

    #[test]
    fn test_no_duplicate_tuples() {
        let repo = EndpointTupleRepo::build(&arch(3), &code(4));
        let unique: BTreeSet<_> = repo.iter().cloned().collect();
        assert_eq!(unique.len(), repo.len());
    }

    #[test]
    fn test_duplicate_endpoints_collapse() {
        let repo = EndpointTupleRepo::from_endpoints(
            [ArchitectureEndpoint::component("a", "A"), ArchitectureEndpoint::component("a", "A")],
            [CodeEndpoint::new("c", "c.rs")],
        );
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn test_empty_model() {
        let repo = EndpointTupleRepo::build(&arch(2), &code(0));
        assert!(repo.is_empty());
        assert_eq!(repo.endpoints(EndpointSide::Architecture).len(), 2);
        assert!(repo.endpoints(EndpointSide::Code).is_empty());
    }

    #[test]
    fn test_every_endpoint_pairs_with_every_other() {
        let repo = EndpointTupleRepo::build(&arch(2), &code(3));
        for endpoint in repo.endpoints(EndpointSide::Architecture) {
            assert_eq!(repo.iter().filter(|t| t.has_endpoint(&endpoint)).count(), 3);
        }
        for endpoint in repo.endpoints(EndpointSide::Code) {
            assert_eq!(repo.iter().filter(|t| t.has_endpoint(&endpoint)).count(), 2);
        }
    }
}
