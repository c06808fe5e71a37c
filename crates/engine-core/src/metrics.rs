use chrono::{DateTime, Utc};
use std::sync::{
    Arc,
    atomic::{AtomicI64, AtomicU64, Ordering},
};

#[derive(Debug, Default)]
struct InnerMetrics {
    chunks_read: AtomicU64,
    chunks_processed: AtomicU64,
    chunks_failed: AtomicU64,
    records_read: AtomicU64,
    records_masked: AtomicU64,
    retry_count: AtomicU64,
    completed_at_ms: AtomicI64,
}

/// Counters of one run, shared between the orchestrator and the local
/// execution metadata tracker.
#[derive(Debug, Clone)]
pub struct Metrics {
    inner: Arc<InnerMetrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub chunks_read: u64,
    pub chunks_processed: u64,
    pub chunks_failed: u64,
    pub records_read: u64,
    pub records_masked: u64,
    pub retry_count: u64,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Metrics {
    pub fn new() -> Self {
        Metrics {
            inner: Arc::new(InnerMetrics::default()),
        }
    }

    pub fn record_chunk_read(&self, records: u64) {
        self.inner.chunks_read.fetch_add(1, Ordering::Relaxed);
        self.inner.records_read.fetch_add(records, Ordering::Relaxed);
    }

    pub fn record_chunk_processed(&self, records_masked: u64) {
        self.inner.chunks_processed.fetch_add(1, Ordering::Relaxed);
        self.inner
            .records_masked
            .fetch_add(records_masked, Ordering::Relaxed);
    }

    pub fn record_chunk_failed(&self) {
        self.inner.chunks_processed.fetch_add(1, Ordering::Relaxed);
        self.inner.chunks_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_retries(&self, count: u64) {
        self.inner.retry_count.fetch_add(count, Ordering::Relaxed);
    }

    pub fn mark_completed(&self, at: DateTime<Utc>) {
        self.inner
            .completed_at_ms
            .store(at.timestamp_millis(), Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let completed_ms = self.inner.completed_at_ms.load(Ordering::Relaxed);
        MetricsSnapshot {
            chunks_read: self.inner.chunks_read.load(Ordering::Relaxed),
            chunks_processed: self.inner.chunks_processed.load(Ordering::Relaxed),
            chunks_failed: self.inner.chunks_failed.load(Ordering::Relaxed),
            records_read: self.inner.records_read.load(Ordering::Relaxed),
            records_masked: self.inner.records_masked.load(Ordering::Relaxed),
            retry_count: self.inner.retry_count.load(Ordering::Relaxed),
            completed_at: (completed_ms != 0)
                .then(|| DateTime::<Utc>::from_timestamp_millis(completed_ms))
                .flatten(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
