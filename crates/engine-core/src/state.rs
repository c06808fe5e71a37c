use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Worst-of outcome across every chunk of a run.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobResult {
    #[default]
    Success,
    Fail,
}

impl JobResult {
    /// Merges two outcomes; `Fail` wins.
    pub fn combine(self, other: JobResult) -> JobResult {
        match (self, other) {
            (JobResult::Success, JobResult::Success) => JobResult::Success,
            _ => JobResult::Fail,
        }
    }
}

impl fmt::Display for JobResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobResult::Success => f.write_str("Success"),
            JobResult::Fail => f.write_str("Fail"),
        }
    }
}

/// Job-scoped state carried from chunk to chunk. Serializable so a host that
/// schedules chunks as separate invocations can persist it in between.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct JobState {
    job_id: String,
    started_at: DateTime<Utc>,
    result: JobResult,
    recipient: Option<String>,
    failed_chunks: Vec<usize>,
}

impl JobState {
    pub fn new(job_id: &str, recipient: Option<String>) -> Self {
        Self::started_at(job_id, recipient, Utc::now())
    }

    pub fn started_at(job_id: &str, recipient: Option<String>, at: DateTime<Utc>) -> Self {
        JobState {
            job_id: job_id.to_string(),
            started_at: at,
            result: JobResult::Success,
            recipient: recipient
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty()),
            failed_chunks: Vec::new(),
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn result(&self) -> JobResult {
        self.result
    }

    /// Report recipient; blank addresses count as none.
    pub fn recipient(&self) -> Option<&str> {
        self.recipient.as_deref()
    }

    pub fn failed_chunks(&self) -> &[usize] {
        &self.failed_chunks
    }

    /// Marks the run as failed. There is no way back to `Success`.
    pub fn record_failure(&mut self, chunk: usize) {
        self.result = self.result.combine(JobResult::Fail);
        if !self.failed_chunks.contains(&chunk) {
            self.failed_chunks.push(chunk);
        }
    }

    /// Folds the state of another unit of the same run into this one.
    pub fn merge(&mut self, other: &JobState) {
        self.result = self.result.combine(other.result);
        self.started_at = self.started_at.min(other.started_at);
        for chunk in &other.failed_chunks {
            if !self.failed_chunks.contains(chunk) {
                self.failed_chunks.push(*chunk);
            }
        }
        self.failed_chunks.sort_unstable();
    }

    pub fn elapsed_ms(&self, now: DateTime<Utc>) -> u64 {
        (now - self.started_at).num_milliseconds().max(0) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::{JobResult, JobState};
    use chrono::{Duration, Utc};

    #[test]
    fn test_failure_is_sticky() {
        let mut state = JobState::new("job-1", None);
        assert_eq!(state.result(), JobResult::Success);

        state.record_failure(2);
        state.record_failure(2);
        assert_eq!(state.result(), JobResult::Fail);
        assert_eq!(state.failed_chunks(), &[2]);

        state.merge(&JobState::new("job-1", None));
        assert_eq!(state.result(), JobResult::Fail);
    }

    #[test]
    fn test_blank_recipient_is_none() {
        assert_eq!(JobState::new("j", Some("  ".into())).recipient(), None);
        assert_eq!(
            JobState::new("j", Some(" ops@example.com ".into())).recipient(),
            Some("ops@example.com")
        );
    }

    #[test]
    fn test_merge_orders_failed_chunks() {
        let start = Utc::now();
        let mut a = JobState::started_at("j", None, start);
        let mut b = JobState::started_at("j", None, start - Duration::seconds(5));
        a.record_failure(3);
        b.record_failure(1);

        a.merge(&b);
        assert_eq!(a.failed_chunks(), &[1, 3]);
        assert_eq!(a.start_time(), start - Duration::seconds(5));
        assert_eq!(a.elapsed_ms(start), 5000);
    }

    #[test]
    fn test_state_survives_serialization() {
        let mut state = JobState::new("job-9", Some("a@b.c".into()));
        state.record_failure(4);
        let json = serde_json::to_string(&state).unwrap();
        let back: JobState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
