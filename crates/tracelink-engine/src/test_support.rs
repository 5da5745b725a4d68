//! Fixtures shared by unit tests

use crate::NodeResult;
use std::sync::Arc;
use tracelink_domain::{
    ArchitectureEndpoint, CodeEndpoint, Confidence, Endpoint, EndpointTuple, EndpointTupleRepo,
};

pub(crate) fn arch(id: &str) -> ArchitectureEndpoint {
    ArchitectureEndpoint::component(id, id.to_uppercase())
}

pub(crate) fn code(id: &str) -> CodeEndpoint {
    CodeEndpoint::new(id, format!("{}.rs", id))
}

pub(crate) fn arch_endpoint(id: &str) -> Endpoint {
    arch(id).into()
}

pub(crate) fn code_endpoint(id: &str) -> Endpoint {
    code(id).into()
}

pub(crate) fn tuple(a: &str, c: &str) -> EndpointTuple {
    EndpointTuple::new(Arc::new(arch(a)), Arc::new(code(c)))
}

pub(crate) fn conf(value: f64) -> Confidence {
    Confidence::of(value).unwrap()
}

pub(crate) fn repo(archs: &[&str], codes: &[&str]) -> EndpointTupleRepo {
    EndpointTupleRepo::from_endpoints(archs.iter().map(|a| arch(a)), codes.iter().map(|c| code(c)))
}

/// A total result over `repo` with the listed values, absent elsewhere
pub(crate) fn result(repo: &EndpointTupleRepo, values: &[(&str, &str, f64)]) -> NodeResult {
    let mut result = NodeResult::seeded(repo);
    for (a, c, v) in values {
        result.insert(tuple(a, c), conf(*v));
    }
    result
}
