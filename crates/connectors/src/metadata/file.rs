use crate::{
    error::MetadataError,
    metadata::{FieldEntry, MetadataSource},
};
use async_trait::async_trait;
use std::{collections::HashMap, path::PathBuf};
use tracing::debug;

/// `dataset -> field set -> ordered members`
type FieldSetDocument = HashMap<String, HashMap<String, Vec<FieldEntry>>>;

/// Field sets kept in a JSON document:
///
/// ```json
/// { "contact": { "ContactFieldsForUpdate": [
///     { "field_path": "Email", "value_type": "email" }
/// ] } }
/// ```
///
/// The file is read again on every `describe`, so editing it changes the
/// next run without a redeploy.
#[derive(Debug, Clone)]
pub struct FileMetadataSource {
    path: PathBuf,
}

impl FileMetadataSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl MetadataSource for FileMetadataSource {
    async fn describe(
        &self,
        dataset: &str,
        field_set: &str,
    ) -> Result<Vec<FieldEntry>, MetadataError> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            MetadataError::Unavailable(format!("{}: {e}", self.path.display()))
        })?;
        let document: FieldSetDocument = serde_json::from_str(&raw)?;
        debug!(path = %self.path.display(), datasets = document.len(), "Loaded field set document");

        document
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(dataset))
            .and_then(|(_, sets)| sets.get(field_set))
            .cloned()
            .ok_or_else(|| MetadataError::UnknownFieldSet {
                dataset: dataset.to_string(),
                field_set: field_set.to_string(),
            })
    }

    fn name(&self) -> String {
        format!("file:{}", self.path.display())
    }
}
