use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, convert::Infallible, fmt, str::FromStr};

/// Declared value type of a maskable field. Drives which masking rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MaskType {
    Date,
    Email,
    Boolean,
    Phone,
    Decimal,
    DateTime,
    Integer,
    /// Anything else: strings, picklists, text areas, addresses and types the
    /// metadata source reports that we do not recognise.
    Text,
}

lazy_static! {
    static ref TYPE_ALIASES: HashMap<&'static str, MaskType> = build_alias_map();
}

impl MaskType {
    pub const ALL: [MaskType; 8] = [
        MaskType::Date,
        MaskType::Email,
        MaskType::Boolean,
        MaskType::Phone,
        MaskType::Decimal,
        MaskType::DateTime,
        MaskType::Integer,
        MaskType::Text,
    ];

    /// Maps a type name reported by a metadata source onto the closed set.
    /// Unknown names fall back to `Text`.
    pub fn from_metadata(type_name: &str) -> Self {
        let normalized = type_name.trim().to_ascii_lowercase();
        TYPE_ALIASES
            .get(normalized.as_str())
            .copied()
            .unwrap_or(MaskType::Text)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MaskType::Date => "Date",
            MaskType::Email => "Email",
            MaskType::Boolean => "Boolean",
            MaskType::Phone => "Phone",
            MaskType::Decimal => "Decimal",
            MaskType::DateTime => "DateTime",
            MaskType::Integer => "Integer",
            MaskType::Text => "Text",
        }
    }
}

impl FromStr for MaskType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(MaskType::from_metadata(s))
    }
}

impl From<String> for MaskType {
    fn from(value: String) -> Self {
        MaskType::from_metadata(&value)
    }
}

impl From<MaskType> for String {
    fn from(value: MaskType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for MaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn build_alias_map() -> HashMap<&'static str, MaskType> {
    HashMap::from([
        ("date", MaskType::Date),
        ("email", MaskType::Email),
        ("boolean", MaskType::Boolean),
        ("bool", MaskType::Boolean),
        ("checkbox", MaskType::Boolean),
        ("phone", MaskType::Phone),
        ("decimal", MaskType::Decimal),
        ("double", MaskType::Decimal),
        ("numeric", MaskType::Decimal),
        ("currency", MaskType::Decimal),
        ("percent", MaskType::Decimal),
        ("float", MaskType::Decimal),
        ("datetime", MaskType::DateTime),
        ("timestamp", MaskType::DateTime),
        ("timestamptz", MaskType::DateTime),
        ("integer", MaskType::Integer),
        ("int", MaskType::Integer),
        ("bigint", MaskType::Integer),
        ("long", MaskType::Integer),
        ("text", MaskType::Text),
        ("string", MaskType::Text),
    ])
}

#[cfg(test)]
mod tests {
    use super::MaskType;

    #[test]
    fn test_aliases_are_case_insensitive() {
        assert_eq!(MaskType::from_metadata("DOUBLE"), MaskType::Decimal);
        assert_eq!(MaskType::from_metadata(" DateTime "), MaskType::DateTime);
        assert_eq!(MaskType::from_metadata("Checkbox"), MaskType::Boolean);
    }

    #[test]
    fn test_unknown_type_falls_back_to_text() {
        assert_eq!(MaskType::from_metadata("picklist"), MaskType::Text);
        assert_eq!(MaskType::from_metadata("address"), MaskType::Text);
        assert_eq!(MaskType::from_metadata(""), MaskType::Text);
    }

    #[test]
    fn test_every_variant_parses_back_from_its_name() {
        for ty in MaskType::ALL {
            assert_eq!(ty.as_str().parse::<MaskType>().unwrap(), ty);
        }
    }

    #[test]
    fn test_serde_uses_type_names() {
        let json = serde_json::to_string(&MaskType::Phone).unwrap();
        assert_eq!(json, "\"Phone\"");
        let parsed: MaskType = serde_json::from_str("\"currency\"").unwrap();
        assert_eq!(parsed, MaskType::Decimal);
    }
}
