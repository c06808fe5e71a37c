use crate::{error::StoreError, store::ContactStore};
use async_trait::async_trait;
use model::{
    pagination::{cursor::Cursor, page::FetchResult},
    records::record::ContactRecord,
};
use planner::query::builder::MaskQuery;
use std::{collections::BTreeMap, ops::Bound};
use tokio::sync::RwLock;

/// Contacts held in memory, ordered by identifier.
#[derive(Debug, Default)]
pub struct MemoryContactStore {
    records: RwLock<BTreeMap<String, ContactRecord>>,
}

impl MemoryContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<ContactRecord>) -> Self {
        Self {
            records: RwLock::new(records.into_iter().map(|r| (r.id.clone(), r)).collect()),
        }
    }

    pub async fn insert(&self, record: ContactRecord) {
        self.records.write().await.insert(record.id.clone(), record);
    }

    pub async fn get(&self, id: &str) -> Option<ContactRecord> {
        self.records.read().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// All records in identifier order.
    pub async fn snapshot(&self) -> Vec<ContactRecord> {
        self.records.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl ContactStore for MemoryContactStore {
    async fn fetch(
        &self,
        query: &MaskQuery,
        cursor: &Cursor,
        limit: usize,
    ) -> Result<FetchResult, StoreError> {
        let fields = query.field_paths();
        let guard = self.records.read().await;
        let start = match cursor.last_id() {
            Some(last) => Bound::Excluded(last.to_string()),
            None => Bound::Unbounded,
        };

        let mut rows = guard.range((start, Bound::Unbounded));
        let records: Vec<ContactRecord> = rows
            .by_ref()
            .take(limit)
            .map(|(_, r)| r.project(&fields))
            .collect();
        let reached_end = rows.next().is_none();

        Ok(FetchResult::after(cursor, records, reached_end))
    }

    async fn update_chunk(
        &self,
        query: &MaskQuery,
        records: &[ContactRecord],
    ) -> Result<usize, StoreError> {
        let mut guard = self.records.write().await;

        if let Some(missing) = records.iter().find(|r| !guard.contains_key(&r.id)) {
            return Err(StoreError::RecordNotFound(missing.id.clone()));
        }

        let writable: Vec<_> = query.writable_fields().collect();
        if writable.is_empty() {
            return Ok(0);
        }

        for record in records {
            if let Some(stored) = guard.get_mut(&record.id) {
                for field in &writable {
                    stored.set(&field.field_path, record.get_value(&field.field_path));
                }
            }
        }

        Ok(records.len())
    }

    fn name(&self) -> String {
        "memory".into()
    }
}
