//! Defines the AST for writing masked values back to one record.

use crate::query::ast::common::{KeyPredicate, TableRef};
use model::core::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub table: TableRef,

    /// `SET column = value` pairs.
    pub assignments: Vec<(String, Value)>,

    /// Selects the one record by identifier.
    pub key: KeyPredicate,
}

impl Update {
    pub fn with_key_type(mut self, key_type: Option<&str>) -> Self {
        self.key.key_type = key_type.map(str::to_string);
        self
    }
}
