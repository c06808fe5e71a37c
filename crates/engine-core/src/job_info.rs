use crate::{
    context::env::{ENV_JOB_ID, EnvContext},
    error::JobInfoError,
    metrics::Metrics,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JobStatus {
    Processing,
    Completed,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Processing => f.write_str("Processing"),
            JobStatus::Completed => f.write_str("Completed"),
        }
    }
}

/// What the host knows about a job execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobInfo {
    pub job_id: String,
    pub status: JobStatus,
    pub total_items: u64,
    pub items_processed: u64,
    pub errors: u64,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Source of execution metadata used when building the report.
#[async_trait]
pub trait ExecutionMetadataSource: Send + Sync {
    async fn job_info(&self, job_id: &str) -> Result<JobInfo, JobInfoError>;
}

/// Derives execution metadata from the counters of the current run.
/// Items are chunks, the same unit the batch host reports.
#[derive(Debug, Clone)]
pub struct LocalJobTracker {
    job_id: String,
    metrics: Metrics,
}

impl LocalJobTracker {
    pub fn new(job_id: &str, metrics: Metrics) -> Self {
        Self {
            job_id: job_id.to_string(),
            metrics,
        }
    }

    pub fn snapshot(&self) -> JobInfo {
        let snap = self.metrics.snapshot();
        JobInfo {
            job_id: self.job_id.clone(),
            status: if snap.completed_at.is_some() {
                JobStatus::Completed
            } else {
                JobStatus::Processing
            },
            total_items: snap.chunks_read,
            items_processed: snap.chunks_processed,
            errors: snap.chunks_failed,
            completed_at: snap.completed_at,
        }
    }
}

#[async_trait]
impl ExecutionMetadataSource for LocalJobTracker {
    async fn job_info(&self, job_id: &str) -> Result<JobInfo, JobInfoError> {
        if job_id != self.job_id {
            return Err(JobInfoError::UnknownJob(job_id.to_string()));
        }
        Ok(self.snapshot())
    }
}

/// Job id supplied by the host through `MASK_JOB_ID`, or a fresh one.
pub fn resolve_job_id(env: &EnvContext) -> String {
    env.get(ENV_JOB_ID)
        .unwrap_or_else(|| format!("job-{}", uuid::Uuid::new_v4().simple()))
}
