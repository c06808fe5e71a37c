use connectors::error::{NotificationError, StoreError};
use planner::error::PlanError;
use thiserror::Error;

/// Errors of one masking run.
///
/// Only `CatalogUnavailable` and `QueryPlan` stop a run; they happen before
/// any chunk is touched. The chunk and notification variants are recorded
/// in the job state, the log sink and the report, and never returned.
#[derive(Error, Debug)]
pub enum JobError {
    #[error("Field mask catalog unavailable: {source}")]
    CatalogUnavailable {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to plan the masking query: {0}")]
    QueryPlan(#[from] PlanError),

    #[error("Failed to read chunk {chunk}: {source}")]
    ChunkFetch {
        chunk: usize,
        #[source]
        source: StoreError,
    },

    #[error("Failed to persist chunk {chunk}: {source}")]
    ChunkPersist {
        chunk: usize,
        #[source]
        source: StoreError,
    },

    #[error("Failed to deliver the job report: {0}")]
    Notification(#[from] NotificationError),
}

impl JobError {
    /// Whether the error aborts the run before any chunk is processed.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            JobError::CatalogUnavailable { .. } | JobError::QueryPlan(_)
        )
    }
}

#[derive(Error, Debug)]
pub enum JobInfoError {
    #[error("No execution metadata for job '{0}'")]
    UnknownJob(String),
}

#[derive(Error, Debug, PartialEq)]
pub enum EnvironmentError {
    #[error("Unknown environment '{0}': expected production or sandbox")]
    Unknown(String),
}
