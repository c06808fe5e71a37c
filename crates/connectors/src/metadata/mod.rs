use crate::error::MetadataError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod file;
pub mod inline;
pub mod postgres;

/// One member of a field set as the metadata source describes it. The type
/// name is the source's own vocabulary; the catalog normalises it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEntry {
    pub field_path: String,
    pub value_type: String,
}

impl FieldEntry {
    pub fn new(field_path: &str, value_type: &str) -> Self {
        FieldEntry {
            field_path: field_path.to_string(),
            value_type: value_type.to_string(),
        }
    }
}

/// Describes which fields of a dataset belong to a named field set.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Ordered members of `field_set` on `dataset`.
    async fn describe(
        &self,
        dataset: &str,
        field_set: &str,
    ) -> Result<Vec<FieldEntry>, MetadataError>;

    fn name(&self) -> String;
}
