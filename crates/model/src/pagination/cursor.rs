use serde::{Deserialize, Serialize};

/// Position of the next chunk within the full query result.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub enum Cursor {
    /// Start of the result set.
    #[default]
    None,

    /// Keyset position: rows continue after `last_id` in identifier order.
    /// `consumed` counts the rows handed out so far.
    Key { last_id: String, consumed: usize },
}

impl Cursor {
    /// Number of rows before this position.
    pub fn offset(&self) -> usize {
        match self {
            Cursor::None => 0,
            Cursor::Key { consumed, .. } => *consumed,
        }
    }

    pub fn last_id(&self) -> Option<&str> {
        match self {
            Cursor::None => None,
            Cursor::Key { last_id, .. } => Some(last_id),
        }
    }

    /// The position after `rows` more records, the last of them `last_id`.
    pub fn advance(&self, last_id: &str, rows: usize) -> Cursor {
        Cursor::Key {
            last_id: last_id.to_string(),
            consumed: self.offset() + rows,
        }
    }
}
