#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub schema: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDir {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOp {
    Eq,
    Gt,
}

/// `column <op> key` on the record identifier. The key is bound as a text
/// parameter and cast to `key_type` when the store knows the column type,
/// so the comparison runs on the native key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPredicate {
    pub column: String,
    pub op: KeyOp,
    pub key: String,
    pub key_type: Option<String>,
}

impl KeyPredicate {
    pub fn new(column: &str, op: KeyOp, key: &str) -> Self {
        KeyPredicate {
            column: column.to_string(),
            op,
            key: key.to_string(),
            key_type: None,
        }
    }
}
