use crate::error::SinkError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};
use tracing::warn;

pub mod jsonl;
pub mod tracing_sink;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Info,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Info => f.write_str("Info"),
            LogLevel::Error => f.write_str("Error"),
        }
    }
}

/// One application-log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub component: String,
    pub operation: String,
    pub job_id: String,
    pub job_id_label: String,
    pub message: String,
    pub extra: String,
    pub error: Option<String>,
    pub elapsed_ms: u64,
    pub logged_at: DateTime<Utc>,
}

impl LogEntry {
    pub fn with_extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = extra.into();
        self
    }

    pub fn with_error(mut self, error: &impl fmt::Display) -> Self {
        self.error = Some(error.to_string());
        self
    }
}

/// Receives structured application-log entries.
#[async_trait]
pub trait LogSink: Send + Sync {
    async fn write(&self, entry: &LogEntry) -> Result<(), SinkError>;
}

/// Writes every entry to each inner sink. All sinks are attempted; the first
/// failure is returned.
pub struct FanoutLogSink {
    sinks: Vec<Arc<dyn LogSink>>,
}

impl FanoutLogSink {
    pub fn new(sinks: Vec<Arc<dyn LogSink>>) -> Self {
        Self { sinks }
    }
}

#[async_trait]
impl LogSink for FanoutLogSink {
    async fn write(&self, entry: &LogEntry) -> Result<(), SinkError> {
        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(err) = sink.write(entry).await {
                warn!(error = %err, "Log sink write failed");
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
