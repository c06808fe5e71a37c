use connectors::error::{MetadataError, StoreError};
use engine_config::error::SettingsError;
use engine_core::error::JobError;
use thiserror::Error;

/// Errors surfaced to whoever triggers a masking run.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Failed to open metadata source: {0}")]
    Metadata(#[from] MetadataError),

    #[error("Failed to open contact store: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Job(#[from] JobError),
}
