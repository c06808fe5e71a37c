use crate::{
    core::value::{FieldValue, Value},
    error::RecordError,
};
use serde::{Deserialize, Serialize};

/// A single contact row: an immutable identifier plus the fields selected
/// for masking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub id: String,
    pub fields: Vec<FieldValue>,
}

impl ContactRecord {
    pub fn new(id: &str) -> Self {
        ContactRecord {
            id: id.to_string(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: &str, value: Value) -> Self {
        self.set(name, value);
        self
    }

    /// Field lookups ignore ASCII case, the way the source platform's field
    /// paths do.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(field))
            .map(|f| &f.value)
    }

    pub fn get_value(&self, field: &str) -> Value {
        self.get(field).cloned().unwrap_or(Value::Null)
    }

    /// Overwrites the field, adding it when the record does not carry it yet.
    pub fn set(&mut self, field: &str, value: Value) {
        match self
            .fields
            .iter_mut()
            .find(|f| f.name.eq_ignore_ascii_case(field))
        {
            Some(existing) => existing.value = value,
            None => self.fields.push(FieldValue::new(field, value)),
        }
    }

    /// Keeps only the named fields, in the given order.
    pub fn project(&self, fields: &[&str]) -> ContactRecord {
        ContactRecord {
            id: self.id.clone(),
            fields: fields
                .iter()
                .map(|name| FieldValue::new(name, self.get_value(name)))
                .collect(),
        }
    }

    /// Reads a flat JSON object such as `{"id": "003A", "Email": "a@b.c"}`.
    pub fn from_json_object(value: &serde_json::Value, id_field: &str) -> Result<Self, RecordError> {
        let object = value
            .as_object()
            .ok_or_else(|| RecordError::NotAnObject(value.to_string()))?;

        let id = Self::json_id_entry(value, id_field)
            .and_then(|(_, v)| match v {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .ok_or_else(|| RecordError::MissingId(id_field.to_string()))?;

        let fields = object
            .iter()
            .filter(|(k, _)| !k.eq_ignore_ascii_case(id_field))
            .map(|(k, v)| FieldValue::new(k, Value::from_json(v)))
            .collect();

        Ok(ContactRecord { id, fields })
    }

    /// Writes the record back as a flat object, the identifier stored under
    /// `id_key` as `id_value`.
    pub fn to_json_object(&self, id_key: &str, id_value: serde_json::Value) -> serde_json::Value {
        let mut object = serde_json::Map::new();
        object.insert(id_key.to_string(), id_value);
        for field in &self.fields {
            object.insert(field.name.clone(), field.value.to_json());
        }
        serde_json::Value::Object(object)
    }

    /// The key and raw JSON value holding the identifier of a flat object.
    pub fn json_id_entry<'a>(
        value: &'a serde_json::Value,
        id_field: &str,
    ) -> Option<(&'a String, &'a serde_json::Value)> {
        value
            .as_object()?
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(id_field))
    }
}
