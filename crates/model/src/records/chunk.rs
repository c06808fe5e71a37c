use crate::{pagination::cursor::Cursor, records::record::ContactRecord};
use chrono::{DateTime, Utc};

/// A bounded, ordered slice of the full contact result set.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// 1-based position of the chunk in the run.
    pub index: usize,
    pub records: Vec<ContactRecord>,
    pub cursor: Cursor, // where this chunk started
    pub next: Cursor,   // where the following chunk starts
    pub read_at: DateTime<Utc>,
}

impl Chunk {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn first_id(&self) -> Option<&str> {
        self.records.first().map(|r| r.id.as_str())
    }

    pub fn last_id(&self) -> Option<&str> {
        self.records.last().map(|r| r.id.as_str())
    }

    /// Short description used in logs and failure entries.
    pub fn describe(&self) -> serde_json::Value {
        serde_json::json!({
            "chunk": self.index,
            "records": self.len(),
            "offset": self.cursor.offset(),
            "first_id": self.first_id(),
            "last_id": self.last_id(),
        })
    }
}
