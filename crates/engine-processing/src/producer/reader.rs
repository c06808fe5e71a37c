use crate::{error::ProducerError, retry::classify_store_error};
use chrono::Utc;
use connectors::store::ContactStore;
use engine_core::retry::RetryPolicy;
use model::{pagination::cursor::Cursor, records::chunk::Chunk};
use planner::query::builder::MaskQuery;
use std::sync::Arc;
use tracing::debug;

/// Walks the full query result in order, one bounded chunk at a time.
///
/// The sequence is lazy and single-pass: once it reports the end it stays
/// there, and restarting means building a new reader.
pub struct ChunkReader {
    store: Arc<dyn ContactStore>,
    query: Arc<MaskQuery>,
    retry: RetryPolicy,
    chunk_size: usize,
    cursor: Cursor,
    next_index: usize,
    exhausted: bool,
}

impl ChunkReader {
    pub fn new(
        store: Arc<dyn ContactStore>,
        query: Arc<MaskQuery>,
        retry: RetryPolicy,
        chunk_size: usize,
    ) -> Self {
        Self {
            store,
            query,
            retry,
            chunk_size: chunk_size.max(1),
            cursor: Cursor::None,
            next_index: 1,
            exhausted: false,
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor.clone()
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Next chunk, or `None` once every record has been handed out.
    /// Transient store errors are retried under the policy.
    pub async fn next_chunk(&mut self) -> Result<Option<Chunk>, ProducerError> {
        if self.exhausted {
            return Ok(None);
        }

        let cursor = self.cursor.clone();
        let limit = self.chunk_size;
        let result = self
            .retry
            .run(
                "fetch_chunk",
                || {
                    let store = self.store.clone();
                    let query = self.query.clone();
                    let cursor = cursor.clone();
                    async move { store.fetch(&query, &cursor, limit).await }
                },
                classify_store_error,
            )
            .await
            .map_err(|err| {
                let attempts = err.attempts();
                ProducerError::Fetch {
                    chunk: self.next_index,
                    offset: cursor.offset(),
                    attempts,
                    source: err.into_inner(),
                }
            })?;

        if result.reached_end || result.row_count() < limit {
            self.exhausted = true;
        }

        if result.records.is_empty() {
            self.exhausted = true;
            return Ok(None);
        }

        let chunk = Chunk {
            index: self.next_index,
            records: result.records,
            cursor,
            next: result.next_cursor.clone(),
            read_at: Utc::now(),
        };
        debug!(chunk = chunk.index, records = chunk.len(), offset = chunk.cursor.offset(), "Read chunk");

        self.cursor = result.next_cursor;
        self.next_index += 1;
        Ok(Some(chunk))
    }
}

#[cfg(test)]
mod tests {
    use super::ChunkReader;
    use connectors::store::{ContactStore, memory::MemoryContactStore};
    use engine_core::retry::RetryPolicy;
    use model::{
        catalog::field::MaskableFieldSpec,
        core::{mask_type::MaskType, value::Value},
        records::record::ContactRecord,
    };
    use planner::query::builder::build_query;
    use std::{collections::HashSet, sync::Arc};

    fn store(n: usize) -> Arc<dyn ContactStore> {
        let records = (0..n)
            .map(|i| {
                ContactRecord::new(&format!("{i:04}"))
                    .with_field("Email", Value::String(format!("user{i}@corp.com")))
            })
            .collect();
        Arc::new(MemoryContactStore::from_records(records))
    }

    fn query() -> Arc<planner::query::builder::MaskQuery> {
        let fields = vec![MaskableFieldSpec::new("Email", MaskType::Email)];
        Arc::new(build_query("contact", "id", &fields).unwrap())
    }

    #[tokio::test]
    async fn test_chunks_partition_the_dataset() {
        let mut reader = ChunkReader::new(store(5), query(), RetryPolicy::no_retry(), 2);

        let mut seen = HashSet::new();
        let mut order = Vec::new();
        let mut sizes = Vec::new();
        while let Some(chunk) = reader.next_chunk().await.unwrap() {
            assert_eq!(chunk.index, sizes.len() + 1);
            sizes.push(chunk.len());
            for record in &chunk.records {
                assert!(seen.insert(record.id.clone()), "duplicate {}", record.id);
                order.push(record.id.clone());
            }
        }

        assert_eq!(sizes, vec![2, 2, 1]);
        assert_eq!(order, vec!["0000", "0001", "0002", "0003", "0004"]);
        assert!(reader.is_exhausted());
        assert!(reader.next_chunk().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_exact_multiple_ends_cleanly() {
        let mut reader = ChunkReader::new(store(4), query(), RetryPolicy::no_retry(), 2);
        let mut count = 0;
        while reader.next_chunk().await.unwrap().is_some() {
            count += 1;
        }
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn test_empty_dataset() {
        let mut reader = ChunkReader::new(store(0), query(), RetryPolicy::no_retry(), 10);
        assert!(reader.next_chunk().await.unwrap().is_none());
    }
}
