use crate::{error::RuntimeError, execution::factory};
use engine_config::settings::MaskingSettings;
use engine_core::error::JobError;
use engine_processing::{catalog::FieldCatalog, transform::RecordTransformer};
use model::catalog::field::MaskableFieldSpec;
use planner::query::builder::{MaskQuery, build_query};

/// Resolves the field mask catalog without touching any record.
pub async fn resolve_catalog(
    settings: &MaskingSettings,
) -> Result<Vec<MaskableFieldSpec>, RuntimeError> {
    let metadata = factory::create_metadata_source(settings).await?;
    let fields = FieldCatalog::new(metadata, &settings.dataset, &settings.field_set)
        .resolve_fields()
        .await
        .map_err(|e| JobError::CatalogUnavailable {
            source: Box::new(e),
        })?;
    Ok(fields)
}

/// The query a run would issue, for inspection.
pub async fn plan_query(settings: &MaskingSettings) -> Result<MaskQuery, RuntimeError> {
    let fields = resolve_catalog(settings).await?;
    let query = build_query(&settings.dataset, &settings.id_field, &fields).map_err(JobError::from)?;
    let excluded = RecordTransformer::new(&settings.excluded_text_fields).excluded_paths(&fields);
    Ok(query.with_read_only(excluded))
}

#[cfg(test)]
mod tests {
    use super::{plan_query, resolve_catalog};
    use crate::error::RuntimeError;
    use connectors::metadata::FieldEntry;
    use engine_config::settings::{MaskingSettings, sources::MetadataSettings};
    use engine_core::error::JobError;

    fn settings(fields: Vec<FieldEntry>) -> MaskingSettings {
        MaskingSettings {
            metadata: MetadataSettings::Inline { fields },
            ..MaskingSettings::default()
        }
    }

    #[tokio::test]
    async fn test_plan_selects_catalog_fields() {
        let query = plan_query(&settings(vec![
            FieldEntry::new("Email", "email"),
            FieldEntry::new("Phone", "phone"),
        ]))
        .await
        .unwrap();
        assert_eq!(query.columns(), vec!["id", "Email", "Phone"]);
    }

    #[tokio::test]
    async fn test_excluded_text_fields_are_read_only() {
        let query = plan_query(&settings(vec![
            FieldEntry::new("Name", "string"),
            FieldEntry::new("Email", "email"),
            FieldEntry::new("MailingGeocodeAccuracy", "picklist"),
        ]))
        .await
        .unwrap();

        assert_eq!(query.read_only, vec!["Name", "MailingGeocodeAccuracy"]);
        let writable: Vec<_> = query
            .writable_fields()
            .map(|f| f.field_path.as_str())
            .collect();
        assert_eq!(writable, vec!["Email"]);
    }

    #[tokio::test]
    async fn test_empty_catalog_is_unavailable() {
        let err = resolve_catalog(&settings(vec![])).await.unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::Job(JobError::CatalogUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_masking_the_identifier_is_a_plan_error() {
        let err = plan_query(&settings(vec![FieldEntry::new("ID", "string")]))
            .await
            .unwrap_err();
        assert!(matches!(err, RuntimeError::Job(JobError::QueryPlan(_))));
    }
}
