use crate::{pagination::cursor::Cursor, records::record::ContactRecord};

/// One page returned by a contact store.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub records: Vec<ContactRecord>,
    pub next_cursor: Cursor,
    pub reached_end: bool,
}

impl FetchResult {
    /// A page read at `cursor`; the next cursor continues after its last record.
    pub fn after(cursor: &Cursor, records: Vec<ContactRecord>, reached_end: bool) -> Self {
        let next_cursor = match records.last() {
            Some(last) => cursor.advance(&last.id, records.len()),
            None => cursor.clone(),
        };

        FetchResult {
            records,
            next_cursor,
            reached_end,
        }
    }

    pub fn row_count(&self) -> usize {
        self.records.len()
    }
}
