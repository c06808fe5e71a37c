use crate::{
    audit::{LogEntry, LogLevel, LogSink},
    error::SinkError,
};
use async_trait::async_trait;
use tracing::{error, info};

/// Re-emits application-log entries as `tracing` events.
#[derive(Debug, Default, Clone)]
pub struct TracingLogSink;

#[async_trait]
impl LogSink for TracingLogSink {
    async fn write(&self, entry: &LogEntry) -> Result<(), SinkError> {
        match entry.level {
            LogLevel::Info => info!(
                component = %entry.component,
                operation = %entry.operation,
                job_id = %entry.job_id,
                elapsed_ms = entry.elapsed_ms,
                extra = %entry.extra,
                "{}",
                entry.message
            ),
            LogLevel::Error => error!(
                component = %entry.component,
                operation = %entry.operation,
                job_id = %entry.job_id,
                elapsed_ms = entry.elapsed_ms,
                extra = %entry.extra,
                error = entry.error.as_deref().unwrap_or(""),
                "{}",
                entry.message
            ),
        }
        Ok(())
    }
}
