//! Pipeline error types
//!
//! Failures carry the stage that produced them so the operator sees stage
//! name and cause together.

use crate::orchestrator::PipelineStage;
use acadlake_common::connect::{BackendKind, ConnectionStatus};
use acadlake_common::errors::EtlError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("{stage}: backend {backend} reported {status:?}")]
    ProbeFailed {
        stage: PipelineStage,
        backend: BackendKind,
        status: ConnectionStatus,
    },

    #[error("{stage} failed: {source}")]
    Stage {
        stage: PipelineStage,
        #[source]
        source: EtlError,
    },
}

impl PipelineError {
    /// The stage the run halted in
    pub fn stage(&self) -> PipelineStage {
        match self {
            PipelineError::ProbeFailed { stage, .. } => *stage,
            PipelineError::Stage { stage, .. } => *stage,
        }
    }

    /// Tag an EtlError with the stage it surfaced in
    pub fn at(stage: PipelineStage) -> impl FnOnce(EtlError) -> Self {
        move |source| PipelineError::Stage { stage, source }
    }
}
