use crate::{error::ConsumerError, retry::classify_store_error};
use connectors::store::ContactStore;
use engine_core::retry::RetryPolicy;
use model::records::record::ContactRecord;
use planner::query::builder::MaskQuery;
use std::{sync::Arc, time::Instant};
use tracing::info;

#[derive(Debug, Clone)]
pub struct WriteResult {
    pub rows_written: usize,
    pub duration: std::time::Duration,
}

/// Persists masked chunks back to the contact store with retry logic.
pub struct ChunkWriter {
    store: Arc<dyn ContactStore>,
    query: Arc<MaskQuery>,
    retry: RetryPolicy,
}

impl ChunkWriter {
    pub fn new(store: Arc<dyn ContactStore>, query: Arc<MaskQuery>, retry: RetryPolicy) -> Self {
        Self {
            store,
            query,
            retry,
        }
    }

    pub async fn persist(
        &self,
        chunk: usize,
        records: &[ContactRecord],
    ) -> Result<WriteResult, ConsumerError> {
        let start = Instant::now();

        let rows_written = self
            .retry
            .run(
                "persist_chunk",
                || {
                    let store = self.store.clone();
                    let query = self.query.clone();
                    async move { store.update_chunk(&query, records).await }
                },
                classify_store_error,
            )
            .await
            .map_err(|err| ConsumerError::Persist {
                chunk,
                attempts: err.attempts(),
                source: err.into_inner(),
            })?;

        let duration = start.elapsed();
        info!(
            chunk,
            rows = rows_written,
            store = %self.store.name(),
            duration_ms = duration.as_millis() as u64,
            "Persisted masked chunk"
        );

        Ok(WriteResult {
            rows_written,
            duration,
        })
    }
}
