use crate::{error::StoreError, store::ContactStore, store::memory::MemoryContactStore};
use async_trait::async_trait;
use model::{
    core::value::Value,
    pagination::{cursor::Cursor, page::FetchResult},
    records::record::ContactRecord,
};
use planner::query::builder::MaskQuery;
use std::{
    collections::{HashMap, HashSet},
    path::PathBuf,
};
use tracing::debug;

/// Contacts kept in a JSON array of flat objects. The whole file is
/// rewritten after every persisted chunk, so chunks written before an
/// interruption stay masked.
///
/// Identifiers are written back under their original key and with their
/// original JSON value.
pub struct JsonFileContactStore {
    inner: MemoryContactStore,
    path: PathBuf,
    /// Record id to the key and raw value it was read from.
    ids: HashMap<String, (String, serde_json::Value)>,
    /// Lower-cased keys that held numbers in the file.
    numeric_fields: HashSet<String>,
}

impl JsonFileContactStore {
    pub async fn open(path: impl Into<PathBuf>, id_field: &str) -> Result<Self, StoreError> {
        let path = path.into();
        let raw = tokio::fs::read_to_string(&path).await?;
        let document: Vec<serde_json::Value> = serde_json::from_str(&raw)?;

        let mut records = Vec::with_capacity(document.len());
        let mut ids = HashMap::with_capacity(document.len());
        let mut numeric_fields = HashSet::new();

        for object in &document {
            let record = ContactRecord::from_json_object(object, id_field)
                .map_err(|e| StoreError::Rejected(e.to_string()))?;

            if let Some((key, value)) = ContactRecord::json_id_entry(object, id_field) {
                ids.insert(record.id.clone(), (key.clone(), value.clone()));
            }
            if let Some(map) = object.as_object() {
                numeric_fields.extend(
                    map.iter()
                        .filter(|(k, v)| v.is_number() && !k.eq_ignore_ascii_case(id_field))
                        .map(|(k, _)| k.to_ascii_lowercase()),
                );
            }
            records.push(record);
        }

        debug!(path = %path.display(), records = records.len(), "Loaded contact file");

        Ok(Self {
            inner: MemoryContactStore::from_records(records),
            path,
            ids,
            numeric_fields,
        })
    }

    pub async fn snapshot(&self) -> Vec<ContactRecord> {
        self.inner.snapshot().await
    }

    fn to_document(&self, record: &ContactRecord) -> serde_json::Value {
        let (id_key, id_value) = match self.ids.get(&record.id) {
            Some((key, value)) => (key.as_str(), value.clone()),
            None => ("id", serde_json::Value::String(record.id.clone())),
        };
        let mut object = record.to_json_object(id_key, id_value);

        if let Some(map) = object.as_object_mut() {
            for field in &record.fields {
                if !self.numeric_fields.contains(&field.name.to_ascii_lowercase()) {
                    continue;
                }
                if let Value::Decimal(decimal) = &field.value {
                    if let Some(number) = decimal
                        .to_string()
                        .parse::<f64>()
                        .ok()
                        .and_then(serde_json::Number::from_f64)
                    {
                        map.insert(field.name.clone(), serde_json::Value::Number(number));
                    }
                }
            }
        }
        object
    }

    async fn save(&self) -> Result<(), StoreError> {
        let document: Vec<serde_json::Value> = self
            .inner
            .snapshot()
            .await
            .iter()
            .map(|r| self.to_document(r))
            .collect();
        let json = serde_json::to_vec_pretty(&document)?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl ContactStore for JsonFileContactStore {
    async fn fetch(
        &self,
        query: &MaskQuery,
        cursor: &Cursor,
        limit: usize,
    ) -> Result<FetchResult, StoreError> {
        self.inner.fetch(query, cursor, limit).await
    }

    async fn update_chunk(
        &self,
        query: &MaskQuery,
        records: &[ContactRecord],
    ) -> Result<usize, StoreError> {
        let written = self.inner.update_chunk(query, records).await?;
        self.save().await?;
        Ok(written)
    }

    fn name(&self) -> String {
        format!("json:{}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::JsonFileContactStore;
    use crate::store::ContactStore;
    use model::{
        catalog::field::MaskableFieldSpec,
        core::{mask_type::MaskType, value::Value},
        records::record::ContactRecord,
    };
    use bigdecimal::BigDecimal;
    use planner::query::builder::build_query;
    use std::str::FromStr;

    fn read(path: &std::path::Path) -> serde_json::Value {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_update_is_written_back_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contacts.json");
        std::fs::write(
            &path,
            r#"[{"id": "003A", "Email": "jane@corp.com", "LastName": "Doe"}]"#,
        )
        .unwrap();

        let store = JsonFileContactStore::open(&path, "id").await.unwrap();
        let query = build_query(
            "contact",
            "id",
            &[MaskableFieldSpec::new("Email", MaskType::Email)],
        )
        .unwrap();
        let masked = ContactRecord::new("003A")
            .with_field("Email", Value::String("test12345678@dummy.com".into()));
        store.update_chunk(&query, &[masked]).await.unwrap();

        let saved = read(&path);
        assert_eq!(saved[0]["Email"], "test12345678@dummy.com");
        assert_eq!(saved[0]["LastName"], "Doe");
        assert_eq!(saved[0]["id"], "003A");
    }

    #[tokio::test]
    async fn test_identifier_keeps_key_and_json_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contacts.json");
        std::fs::write(
            &path,
            r#"[{"Id": 42, "Email": "a@b.c", "AnnualIncome": 81000.5}]"#,
        )
        .unwrap();

        let store = JsonFileContactStore::open(&path, "id").await.unwrap();
        let query = build_query(
            "contact",
            "id",
            &[
                MaskableFieldSpec::new("Email", MaskType::Email),
                MaskableFieldSpec::new("AnnualIncome", MaskType::Decimal),
            ],
        )
        .unwrap();
        let masked = ContactRecord::new("42")
            .with_field("Email", Value::String("test00000042@dummy.com".into()))
            .with_field(
                "AnnualIncome",
                Value::Decimal(BigDecimal::from_str("5.00").unwrap()),
            );
        store.update_chunk(&query, &[masked]).await.unwrap();

        let saved = read(&path);
        assert_eq!(saved[0]["Id"], serde_json::json!(42));
        assert!(saved[0].get("id").is_none());
        assert_eq!(saved[0]["Email"], "test00000042@dummy.com");
        assert_eq!(saved[0]["AnnualIncome"], serde_json::json!(5.0));

        // A second open reads the same identifier back.
        let reopened = JsonFileContactStore::open(&path, "id").await.unwrap();
        assert_eq!(reopened.snapshot().await[0].id, "42");
    }
}
