use crate::error::CatalogError;
use connectors::metadata::MetadataSource;
use model::{catalog::field::MaskableFieldSpec, core::mask_type::MaskType};
use std::{collections::HashSet, sync::Arc};
use tracing::{debug, info, warn};

/// Resolves which fields of a dataset get masked, and how.
///
/// Nothing here names a concrete field: the list comes from the metadata
/// source every run, so changing it never requires a redeploy.
pub struct FieldCatalog {
    source: Arc<dyn MetadataSource>,
    dataset: String,
    field_set: String,
}

impl FieldCatalog {
    pub fn new(source: Arc<dyn MetadataSource>, dataset: &str, field_set: &str) -> Self {
        Self {
            source,
            dataset: dataset.to_string(),
            field_set: field_set.to_string(),
        }
    }

    /// Ordered, duplicate-free field specs. Paths that repeat
    /// case-insensitively keep their first occurrence.
    pub async fn resolve_fields(&self) -> Result<Vec<MaskableFieldSpec>, CatalogError> {
        let entries = self.source.describe(&self.dataset, &self.field_set).await?;

        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(entries.len());

        for entry in entries {
            let path = entry.field_path.trim();
            if path.is_empty() {
                return Err(CatalogError::InvalidEntry {
                    field_set: self.field_set.clone(),
                });
            }

            if !seen.insert(path.to_ascii_lowercase()) {
                warn!(field = path, field_set = %self.field_set, "Duplicate field in field set, ignoring");
                continue;
            }

            let value_type = MaskType::from_metadata(&entry.value_type);
            debug!(field = path, declared = %entry.value_type, %value_type, "Resolved maskable field");
            fields.push(MaskableFieldSpec::new(path, value_type));
        }

        if fields.is_empty() {
            return Err(CatalogError::Empty {
                dataset: self.dataset.clone(),
                field_set: self.field_set.clone(),
            });
        }

        info!(
            dataset = %self.dataset,
            field_set = %self.field_set,
            source = %self.source.name(),
            fields = fields.len(),
            "Field mask catalog resolved"
        );
        Ok(fields)
    }
}
