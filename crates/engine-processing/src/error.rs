use connectors::error::{MetadataError, StoreError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Metadata source unavailable: {0}")]
    Unavailable(#[from] MetadataError),

    #[error("Field set '{field_set}' on '{dataset}' has no fields")]
    Empty { dataset: String, field_set: String },

    #[error("Field set '{field_set}' contains an entry without a field path")]
    InvalidEntry { field_set: String },
}

#[derive(Error, Debug)]
pub enum ProducerError {
    #[error("Failed to fetch chunk {chunk} at offset {offset} after {attempts} attempt(s): {source}")]
    Fetch {
        chunk: usize,
        offset: usize,
        attempts: usize,
        #[source]
        source: StoreError,
    },
}

#[derive(Error, Debug)]
pub enum ConsumerError {
    #[error("Failed to persist chunk {chunk} after {attempts} attempt(s): {source}")]
    Persist {
        chunk: usize,
        attempts: usize,
        #[source]
        source: StoreError,
    },
}

impl ProducerError {
    pub fn chunk(&self) -> usize {
        match self {
            ProducerError::Fetch { chunk, .. } => *chunk,
        }
    }

    pub fn into_store_error(self) -> StoreError {
        match self {
            ProducerError::Fetch { source, .. } => source,
        }
    }
}

impl ConsumerError {
    pub fn chunk(&self) -> usize {
        match self {
            ConsumerError::Persist { chunk, .. } => *chunk,
        }
    }

    pub fn into_store_error(self) -> StoreError {
        match self {
            ConsumerError::Persist { source, .. } => source,
        }
    }
}
