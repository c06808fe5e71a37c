use crate::{
    error::MetadataError,
    metadata::{FieldEntry, MetadataSource},
    postgres::connect_client,
};
use async_trait::async_trait;
use std::sync::Arc;
use tokio_postgres::Client;

const QUERY_FIELD_SET_SQL: &str = "SELECT field_path, value_type \
     FROM mask_field_sets \
     WHERE lower(dataset) = lower($1) AND field_set = $2 \
     ORDER BY position, field_path";

/// Field sets stored in the `mask_field_sets` table of the target database.
#[derive(Clone)]
pub struct PgMetadataSource {
    client: Arc<Client>,
}

impl PgMetadataSource {
    pub async fn connect(url: &str) -> Result<Self, MetadataError> {
        let client = connect_client(url).await?;
        Ok(Self {
            client: Arc::new(client),
        })
    }
}

#[async_trait]
impl MetadataSource for PgMetadataSource {
    async fn describe(
        &self,
        dataset: &str,
        field_set: &str,
    ) -> Result<Vec<FieldEntry>, MetadataError> {
        let rows = self
            .client
            .query(QUERY_FIELD_SET_SQL, &[&dataset, &field_set])
            .await?;

        if rows.is_empty() {
            return Err(MetadataError::UnknownFieldSet {
                dataset: dataset.to_string(),
                field_set: field_set.to_string(),
            });
        }

        rows.iter()
            .map(|row| -> Result<FieldEntry, MetadataError> {
                Ok(FieldEntry {
                    field_path: row.try_get(0)?,
                    value_type: row.try_get(1)?,
                })
            })
            .collect()
    }

    fn name(&self) -> String {
        "postgres".into()
    }
}
