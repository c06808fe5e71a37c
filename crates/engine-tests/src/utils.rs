#![allow(dead_code)]

use async_trait::async_trait;
use connectors::{
    audit::{LogEntry, LogLevel, LogSink},
    error::{MetadataError, NotificationError, SinkError, StoreError},
    metadata::{FieldEntry, MetadataSource},
    notify::{Notification, Notifier},
    store::{ContactStore, memory::MemoryContactStore},
};
use engine_core::{
    error::JobInfoError,
    job_info::{ExecutionMetadataSource, JobInfo},
};
use model::{
    pagination::{cursor::Cursor, page::FetchResult},
    records::record::ContactRecord,
};
use planner::query::builder::MaskQuery;
use std::{
    collections::HashSet,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

/// Keeps every entry it receives.
#[derive(Default)]
pub struct RecordingLogSink {
    entries: Mutex<Vec<LogEntry>>,
}

impl RecordingLogSink {
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<LogEntry> {
        self.entries()
            .into_iter()
            .filter(|e| e.level == LogLevel::Error)
            .collect()
    }

    pub fn by_operation(&self, operation: &str) -> Vec<LogEntry> {
        self.entries()
            .into_iter()
            .filter(|e| e.operation == operation)
            .collect()
    }
}

#[async_trait]
impl LogSink for RecordingLogSink {
    async fn write(&self, entry: &LogEntry) -> Result<(), SinkError> {
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }
}

/// Always fails to write.
pub struct BrokenLogSink;

#[async_trait]
impl LogSink for BrokenLogSink {
    async fn write(&self, _entry: &LogEntry) -> Result<(), SinkError> {
        Err(SinkError::Io(std::io::Error::other("disk full")))
    }
}

/// Records notifications; optionally rejects them.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
    calls: AtomicUsize,
    reject: bool,
}

impl RecordingNotifier {
    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.reject {
            return Err(NotificationError::Rejected(503));
        }
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }

    fn name(&self) -> String {
        "recording".into()
    }
}

/// A memory store that refuses chunks containing given ids, or stops
/// answering reads past a given offset.
pub struct FailingChunkStore {
    pub inner: MemoryContactStore,
    failing_ids: HashSet<String>,
    fail_fetch_from: Option<usize>,
    update_calls: AtomicUsize,
}

impl FailingChunkStore {
    pub fn new(records: Vec<ContactRecord>) -> Self {
        Self {
            inner: MemoryContactStore::from_records(records),
            failing_ids: HashSet::new(),
            fail_fetch_from: None,
            update_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_on(mut self, id: &str) -> Self {
        self.failing_ids.insert(id.to_string());
        self
    }

    pub fn failing_fetch_from(mut self, offset: usize) -> Self {
        self.fail_fetch_from = Some(offset);
        self
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContactStore for FailingChunkStore {
    async fn fetch(
        &self,
        query: &MaskQuery,
        cursor: &Cursor,
        limit: usize,
    ) -> Result<FetchResult, StoreError> {
        if self.fail_fetch_from.is_some_and(|from| cursor.offset() >= from) {
            return Err(StoreError::Rejected("query cursor invalidated".into()));
        }
        self.inner.fetch(query, cursor, limit).await
    }

    async fn update_chunk(
        &self,
        query: &MaskQuery,
        records: &[ContactRecord],
    ) -> Result<usize, StoreError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(bad) = records.iter().find(|r| self.failing_ids.contains(&r.id)) {
            return Err(StoreError::Rejected(format!(
                "FIELD_CUSTOM_VALIDATION_EXCEPTION on record {}",
                bad.id
            )));
        }
        self.inner.update_chunk(query, records).await
    }

    fn name(&self) -> String {
        "failing-memory".into()
    }
}

/// A metadata source that cannot be reached.
pub struct UnreachableMetadata;

#[async_trait]
impl MetadataSource for UnreachableMetadata {
    async fn describe(
        &self,
        _dataset: &str,
        _field_set: &str,
    ) -> Result<Vec<FieldEntry>, MetadataError> {
        Err(MetadataError::Unavailable("schema service timed out".into()))
    }

    fn name(&self) -> String {
        "unreachable".into()
    }
}

/// Execution metadata source that never knows the job.
pub struct ForgetfulJobRegistry;

#[async_trait]
impl ExecutionMetadataSource for ForgetfulJobRegistry {
    async fn job_info(&self, job_id: &str) -> Result<JobInfo, JobInfoError> {
        Err(JobInfoError::UnknownJob(job_id.to_string()))
    }
}
