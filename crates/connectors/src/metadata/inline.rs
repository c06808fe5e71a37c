use crate::{
    error::MetadataError,
    metadata::{FieldEntry, MetadataSource},
};
use async_trait::async_trait;

/// Field set declared directly in the job settings.
#[derive(Debug, Clone)]
pub struct InlineMetadataSource {
    dataset: String,
    field_set: String,
    entries: Vec<FieldEntry>,
}

impl InlineMetadataSource {
    pub fn new(dataset: &str, field_set: &str, entries: Vec<FieldEntry>) -> Self {
        Self {
            dataset: dataset.to_string(),
            field_set: field_set.to_string(),
            entries,
        }
    }
}

#[async_trait]
impl MetadataSource for InlineMetadataSource {
    async fn describe(
        &self,
        dataset: &str,
        field_set: &str,
    ) -> Result<Vec<FieldEntry>, MetadataError> {
        if self.dataset.eq_ignore_ascii_case(dataset) && self.field_set == field_set {
            Ok(self.entries.clone())
        } else {
            Err(MetadataError::UnknownFieldSet {
                dataset: dataset.to_string(),
                field_set: field_set.to_string(),
            })
        }
    }

    fn name(&self) -> String {
        "inline".into()
    }
}
