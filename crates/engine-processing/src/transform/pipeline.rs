use crate::transform::{
    rules::MaskRules,
    token::{TimeSeededTokens, TokenSource},
};
use model::{
    catalog::field::MaskableFieldSpec, core::mask_type::MaskType, records::record::ContactRecord,
};
use std::{collections::HashSet, sync::Arc};

/// Applies the masking rules to every catalog field of a batch of records.
///
/// Text fields listed as excluded are left as they are; the store computes
/// them and rejects direct writes. The exclusion applies to the text rule
/// only, a typed field with an excluded path is still masked.
#[derive(Clone)]
pub struct RecordTransformer {
    excluded_text_fields: HashSet<String>,
    tokens: Arc<dyn TokenSource>,
}

impl RecordTransformer {
    pub fn new(excluded_text_fields: &[String]) -> Self {
        Self {
            excluded_text_fields: excluded_text_fields
                .iter()
                .map(|f| f.to_ascii_lowercase())
                .collect(),
            tokens: Arc::new(TimeSeededTokens),
        }
    }

    pub fn with_tokens(mut self, tokens: Arc<dyn TokenSource>) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn is_excluded(&self, field: &MaskableFieldSpec) -> bool {
        field.value_type == MaskType::Text
            && self
                .excluded_text_fields
                .contains(&field.field_path.to_ascii_lowercase())
    }

    /// Catalog paths left as read, which must never be written back.
    pub fn excluded_paths(&self, fields: &[MaskableFieldSpec]) -> Vec<String> {
        fields
            .iter()
            .filter(|f| self.is_excluded(f))
            .map(|f| f.field_path.clone())
            .collect()
    }

    pub fn transform(
        &self,
        records: &[ContactRecord],
        fields: &[MaskableFieldSpec],
    ) -> Vec<ContactRecord> {
        self.transform_at(records, fields, &MaskRules::now())
    }

    /// Same identifiers in, same identifiers out; only catalog fields change.
    pub fn transform_at(
        &self,
        records: &[ContactRecord],
        fields: &[MaskableFieldSpec],
        rules: &MaskRules,
    ) -> Vec<ContactRecord> {
        records
            .iter()
            .map(|record| {
                let mut masked = record.clone();
                for field in fields {
                    if self.is_excluded(field) {
                        continue;
                    }
                    let value = rules.value_for(field.value_type, self.tokens.as_ref());
                    masked.set(&field.field_path, value);
                }
                masked
            })
            .collect()
    }
}
