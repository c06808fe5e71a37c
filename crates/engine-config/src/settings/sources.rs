use connectors::metadata::FieldEntry;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the field set definitions come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MetadataSettings {
    /// Fields declared directly in the settings document.
    Inline {
        #[serde(default)]
        fields: Vec<FieldEntry>,
    },
    /// A JSON document of `{dataset: {field_set: [fields]}}`.
    File { path: PathBuf },
    /// The `mask_field_sets` table.
    Postgres { url: String },
}

impl Default for MetadataSettings {
    fn default() -> Self {
        MetadataSettings::Inline { fields: Vec::new() }
    }
}

/// The contact store holding the records to mask.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoreSettings {
    #[default]
    Memory,
    Json {
        path: PathBuf,
    },
    Postgres {
        url: String,
    },
}
