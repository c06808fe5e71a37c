//! Defines the Abstract Syntax Tree (AST) for the chunk read query.

use crate::query::ast::common::{KeyPredicate, OrderDir, TableRef};

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    /// Columns returned for every row, identifier first.
    pub columns: Vec<String>,

    /// e.g., `FROM contact`
    pub from: TableRef,

    /// Keyset bound: only rows after the last identifier of the previous chunk.
    pub after: Option<KeyPredicate>,

    /// The ORDER BY clause. Keeps chunk boundaries stable for one run.
    pub order_by: Vec<OrderByExpr>,

    /// The LIMIT clause (chunk size).
    pub limit: Option<usize>,
}

impl Select {
    pub fn with_key_type(mut self, key_type: Option<&str>) -> Self {
        if let Some(after) = self.after.as_mut() {
            after.key_type = key_type.map(str::to_string);
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderByExpr {
    pub column: String,
    pub direction: Option<OrderDir>,
}
