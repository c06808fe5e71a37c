use crate::{error::StoreError, postgres::connect_client, store::ContactStore};
use async_trait::async_trait;
use model::{
    core::value::Value,
    pagination::{cursor::Cursor, page::FetchResult},
    records::record::ContactRecord,
};
use planner::query::{
    builder::MaskQuery,
    dialect::Postgres,
    renderer::{Render, Renderer, render},
};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tokio_postgres::{Client, Row, types::ToSql};
use tracing::debug;

const KEY_TYPE_SQL: &str = "SELECT format_type(a.atttypid, a.atttypmod) \
     FROM pg_attribute a \
     WHERE a.attrelid = to_regclass($1) AND a.attname = $2 \
       AND a.attnum > 0 AND NOT a.attisdropped";

/// Contacts stored in a PostgreSQL table.
///
/// Rows are read with every column cast to text; masked values are written as
/// literals so the server coerces them to the column types. Pages and updates
/// compare the identifier in its own column type so the key index is used.
pub struct PgContactStore {
    client: Mutex<Client>,
    key_types: Mutex<HashMap<String, String>>,
}

impl PgContactStore {
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client = connect_client(url).await?;
        Ok(Self {
            client: Mutex::new(client),
            key_types: Mutex::new(HashMap::new()),
        })
    }

    /// SQL type of the identifier column, looked up once per table.
    async fn key_type(&self, query: &MaskQuery) -> Result<String, StoreError> {
        let mut renderer = Renderer::new(&Postgres);
        renderer.render_table_ref(&query.table);
        let (table, _) = renderer.finish();
        let cache_key = format!("{table}.{}", query.id_field);

        let mut key_types = self.key_types.lock().await;
        if let Some(key_type) = key_types.get(&cache_key) {
            return Ok(key_type.clone());
        }

        let row = {
            let client = self.client.lock().await;
            client
                .query_opt(KEY_TYPE_SQL, &[&table, &query.id_field])
                .await?
        };
        let key_type: String = match row {
            Some(row) => row.try_get(0)?,
            None => {
                return Err(StoreError::Rejected(format!(
                    "column '{}' not found on {table}",
                    query.id_field
                )));
            }
        };

        debug!(%table, id_field = %query.id_field, %key_type, "Resolved identifier type");
        key_types.insert(cache_key, key_type.clone());
        Ok(key_type)
    }

    fn to_record(row: &Row, query: &MaskQuery) -> Result<ContactRecord, StoreError> {
        let id: Option<String> = row.try_get(0)?;
        let id = id.ok_or_else(|| {
            StoreError::Rejected(format!("row without '{}' value", query.id_field))
        })?;

        let mut record = ContactRecord::new(&id);
        for (i, field) in query.fields.iter().enumerate() {
            let text: Option<String> = row.try_get(i + 1)?;
            record.set(&field.field_path, text.map(Value::String).unwrap_or(Value::Null));
        }
        Ok(record)
    }
}

fn page_statement(
    query: &MaskQuery,
    cursor: &Cursor,
    limit: usize,
    key_type: &str,
) -> (String, Vec<Value>) {
    let mut renderer = Renderer::new(&Postgres).with_text_projection();
    query
        .page(cursor, limit)
        .with_key_type(Some(key_type))
        .render(&mut renderer);
    renderer.finish()
}

fn update_statement(
    query: &MaskQuery,
    record: &ContactRecord,
    key_type: &str,
) -> Option<(String, Vec<Value>)> {
    query
        .update_for(record)
        .map(|update| render(&update.with_key_type(Some(key_type)), &Postgres))
}

fn text_params(params: &[Value]) -> Vec<Option<String>> {
    params.iter().map(|v| v.as_string()).collect()
}

#[async_trait]
impl ContactStore for PgContactStore {
    async fn fetch(
        &self,
        query: &MaskQuery,
        cursor: &Cursor,
        limit: usize,
    ) -> Result<FetchResult, StoreError> {
        let key_type = self.key_type(query).await?;
        let (sql, params) = page_statement(query, cursor, limit, &key_type);
        debug!(%sql, "Fetching contact chunk");

        let params = text_params(&params);
        let refs: Vec<&(dyn ToSql + Sync)> =
            params.iter().map(|p| p as &(dyn ToSql + Sync)).collect();

        let client = self.client.lock().await;
        let rows = client.query(sql.as_str(), &refs).await?;
        let records = rows
            .iter()
            .map(|row| Self::to_record(row, query))
            .collect::<Result<Vec<_>, _>>()?;

        let reached_end = records.len() < limit;
        Ok(FetchResult::after(cursor, records, reached_end))
    }

    async fn update_chunk(
        &self,
        query: &MaskQuery,
        records: &[ContactRecord],
    ) -> Result<usize, StoreError> {
        let key_type = self.key_type(query).await?;
        let mut client = self.client.lock().await;
        let tx = client.transaction().await?;
        let mut written = 0;

        for record in records {
            let Some((sql, params)) = update_statement(query, record, &key_type) else {
                continue;
            };
            let params = text_params(&params);
            let refs: Vec<&(dyn ToSql + Sync)> =
                params.iter().map(|p| p as &(dyn ToSql + Sync)).collect();

            // Dropping `tx` without commit rolls the whole chunk back.
            if tx.execute(sql.as_str(), &refs).await? == 0 {
                return Err(StoreError::RecordNotFound(record.id.clone()));
            }
            written += 1;
        }

        tx.commit().await?;
        Ok(written)
    }

    fn name(&self) -> String {
        "postgres".into()
    }
}
