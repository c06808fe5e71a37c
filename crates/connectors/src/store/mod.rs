use crate::error::StoreError;
use async_trait::async_trait;
use model::{
    pagination::{cursor::Cursor, page::FetchResult},
    records::record::ContactRecord,
};
use planner::query::builder::MaskQuery;

pub mod json_file;
pub mod memory;
pub mod postgres;

/// The persistent contact store the masking job reads from and writes to.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Executes `query` and returns up to `limit` records starting at `cursor`.
    /// Records carry the identifier and exactly the query's fields.
    async fn fetch(
        &self,
        query: &MaskQuery,
        cursor: &Cursor,
        limit: usize,
    ) -> Result<FetchResult, StoreError>;

    /// Writes the query's fields of every record back. A chunk is applied
    /// completely or not at all. Returns the number of records written.
    async fn update_chunk(
        &self,
        query: &MaskQuery,
        records: &[ContactRecord],
    ) -> Result<usize, StoreError>;

    fn name(&self) -> String;
}
