use crate::error::ReportError;
use chrono::{DateTime, Utc};
use engine_core::{
    job_info::{JobInfo, JobStatus},
    metrics::MetricsSnapshot,
    state::{JobResult, JobState},
};
use serde::Serialize;

const RULE: &str = "============================================";

/// Read-only summary of a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionReport {
    pub job_name: String,
    pub job_id: String,
    pub result: JobResult,
    pub status: JobStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub total_items: u64,
    pub items_processed: u64,
    pub errors: u64,
    pub records_read: u64,
    pub records_masked: u64,
    pub failed_chunks: Vec<usize>,
    pub masking_skipped: bool,
}

impl ExecutionReport {
    pub fn new(
        job_name: &str,
        state: &JobState,
        info: &JobInfo,
        metrics: &MetricsSnapshot,
        finished_at: DateTime<Utc>,
        masking_skipped: bool,
    ) -> Self {
        ExecutionReport {
            job_name: job_name.to_string(),
            job_id: state.job_id().to_string(),
            result: state.result(),
            status: info.status,
            started_at: state.start_time(),
            finished_at,
            elapsed_ms: state.elapsed_ms(finished_at),
            total_items: info.total_items,
            items_processed: info.items_processed,
            errors: info.errors,
            records_read: metrics.records_read,
            records_masked: metrics.records_masked,
            failed_chunks: state.failed_chunks().to_vec(),
            masking_skipped,
        }
    }

    pub fn is_success(&self) -> bool {
        self.result == JobResult::Success
    }

    pub fn headline(&self) -> String {
        if self.is_success() {
            format!("{} Job Successful", self.job_name)
        } else {
            format!("{} Job Errored", self.job_name)
        }
    }

    /// Subject line of the notification: the configured prefix plus status.
    pub fn subject(&self, prefix: &str) -> String {
        format!("{} {}", prefix.trim_end(), self.status)
    }

    pub fn render_plain_text(&self) -> String {
        let mut lines = vec![
            self.headline(),
            RULE.to_string(),
            format!("Job #: {}", self.job_id),
            format!("Start Time: {}", self.started_at.format("%Y-%m-%d %H:%M:%S")),
            format!("End Time: {}", self.finished_at.format("%Y-%m-%d %H:%M:%S")),
            format!("Execution Time: {}", self.elapsed_ms),
            format!("Status: {}", self.status),
            format!("Total Items: {}", self.total_items),
            format!("Items Processed: {}", self.items_processed),
            format!("No. of Errors: {}", self.errors),
            format!("Result: {}", self.result),
        ];
        if self.masking_skipped {
            lines.push("Masking skipped: production environment".to_string());
        }
        lines.push(RULE.to_string());
        lines.join("\n")
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
