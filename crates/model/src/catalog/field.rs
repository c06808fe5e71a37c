use crate::core::mask_type::MaskType;
use serde::{Deserialize, Serialize};

/// One field the masking job must overwrite, with its declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskableFieldSpec {
    pub field_path: String,
    pub value_type: MaskType,
}

impl MaskableFieldSpec {
    pub fn new(field_path: &str, value_type: MaskType) -> Self {
        MaskableFieldSpec {
            field_path: field_path.to_string(),
            value_type,
        }
    }
}
