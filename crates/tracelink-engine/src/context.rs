//! Evaluation context shared by every node of one run

use crate::{CancellationToken, EngineConfig, EngineError};
use rayon::prelude::*;
use tracelink_domain::{ArchitectureModel, CodeModel, EndpointTupleRepo};

/// Read-only inputs of a computation run
///
/// The repo is built before any node is evaluated, so parallel sections
/// only ever read it.
#[derive(Clone, Copy)]
pub struct EvaluationContext<'a> {
    /// Architecture model under analysis
    pub architecture_model: &'a dyn ArchitectureModel,
    /// Code model under analysis
    pub code_model: &'a dyn CodeModel,
    /// Cross product of both models' endpoints
    pub repo: &'a EndpointTupleRepo,
    /// Evaluation settings
    pub config: &'a EngineConfig,
    /// Cancellation flag
    pub cancellation: &'a CancellationToken,
}

impl<'a> EvaluationContext<'a> {
    /// Fail with [`EngineError::Cancelled`] once cancellation was requested
    pub fn checkpoint(&self) -> Result<(), EngineError> {
        if self.cancellation.is_cancelled() {
            return Err(EngineError::Cancelled);
        }
        Ok(())
    }

    /// Map `items` through `f`, checking for cancellation before each item
    ///
    /// Runs on the rayon pool when the configuration allows it for this many
    /// items. Output order matches input order either way.
    pub fn try_map<T, R, F>(&self, items: &[T], f: F) -> Result<Vec<R>, EngineError>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> Result<R, EngineError> + Sync + Send,
    {
        if self.config.runs_parallel(items.len()) {
            items
                .par_iter()
                .map(|item| {
                    self.checkpoint()?;
                    f(item)
                })
                .collect()
        } else {
            items
                .iter()
                .map(|item| {
                    self.checkpoint()?;
                    f(item)
                })
                .collect()
        }
    }
}
